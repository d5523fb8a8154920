//! The `Sql` facade.
//!
//! One facade owns one [`Engine`]. Every query, including the ones the
//! builders produce, goes through the same [`Rewriter`] before it reaches
//! the engine. The connection is opened on first use.

use crate::bulk::BulkInsert;
use crate::cache::{ResultCache, cache_key};
use crate::config::SqlConfig;
use crate::diagnostics::{QueryFailure, QueryLog};
use crate::dialect::EngineMode;
use crate::engine::{Engine, engine_for};
use crate::error::{SqlError, SqlResult};
use crate::result::{BufferedRows, QueryResult};
use crate::rewriter::prepare::apply_null_policy;
use crate::rewriter::{Rewriter, Rewritten};
use crate::value::{Params, Value};
use crate::where_clause::{Condition, Where, build_where, order_by, quote_field, select_fields};
use std::collections::HashMap;
use std::sync::Arc;

pub struct Sql {
    config: SqlConfig,
    engine: Box<dyn Engine>,
    cache: Option<Arc<dyn ResultCache>>,
    log: QueryLog,
    locked: bool,
    in_transaction: bool,
}

impl Sql {
    /// Build the facade with the registry engine for `config.mode`.
    ///
    /// No connection is attempted here.
    pub fn new(config: SqlConfig) -> SqlResult<Self> {
        let engine = engine_for(config.mode, &config.url)?;
        Ok(Self::with_engine(config, engine))
    }

    pub fn with_engine(config: SqlConfig, engine: Box<dyn Engine>) -> Self {
        let log = QueryLog::new(config.log_dir.clone());
        Self {
            config,
            engine,
            cache: None,
            log,
            locked: false,
            in_transaction: false,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &SqlConfig {
        &self.config
    }

    pub fn mode(&self) -> EngineMode {
        self.engine.mode()
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn connect(&mut self) -> SqlResult<()> {
        self.engine.connect()
    }

    pub fn disconnect(&mut self) -> SqlResult<()> {
        self.engine.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.engine.is_connected()
    }

    // -- Rewriting --------------------------------------------------------

    fn rewriter(&self) -> Rewriter<'_> {
        Rewriter::new(self.engine.mode(), &self.config.tables).allow_nulls(self.config.allow_nulls)
    }

    /// Rewrite without executing.
    pub fn rewrite(&self, query: &str, params: impl Into<Params>) -> SqlResult<Rewritten> {
        let engine = self.engine.as_ref();
        let rewritten = self.rewriter().rewrite_with(query, params.into(), &|s| {
            engine.quote_value(&Value::from(s))
        })?;
        tracing::debug!(
            mode = %self.mode(),
            query = %rewritten.query,
            params = rewritten.params.len(),
            "rewritten"
        );
        Ok(rewritten)
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        quote_field(name, self.engine.dialect())
    }

    pub fn quote_value(&self, value: &Value) -> String {
        self.engine.quote_value(value)
    }

    /// Fully qualified, quoted reference for a logical table name.
    pub fn table_name(&self, table: &str) -> String {
        self.rewriter().table(table)
    }

    // -- Execution --------------------------------------------------------

    /// Rewrite and execute `query`.
    pub fn query(&mut self, query: &str, params: impl Into<Params>) -> SqlResult<QueryResult> {
        let rewritten = self.rewrite(query, params)?;
        self.run(&rewritten)
    }

    /// Like [`query`](Self::query), served from the result cache when
    /// possible. Without a cache this runs the query live.
    pub fn query_cached(
        &mut self,
        query: &str,
        params: impl Into<Params>,
    ) -> SqlResult<QueryResult> {
        let rewritten = self.rewrite(query, params)?;
        let Some(cache) = self.cache.clone() else {
            return self.run(&rewritten);
        };

        let key = cache_key(&rewritten.prepared);
        if let Some(rows) = cache.get(key) {
            tracing::debug!(key, "result cache hit");
            return Ok(QueryResult::new(rows));
        }

        let mut live = self.run(&rewritten)?;
        let rows = materialize(&mut live)?;
        cache.put(key, rows.clone());
        Ok(QueryResult::new(rows))
    }

    fn run(&mut self, rewritten: &Rewritten) -> SqlResult<QueryResult> {
        match self
            .engine
            .execute(&rewritten.query, &rewritten.params, &rewritten.prepared)
        {
            Ok(native) => Ok(QueryResult::from_boxed(native)),
            Err(error) => {
                self.log.record(&QueryFailure {
                    query: &rewritten.query,
                    params: &rewritten.params,
                    prepared: &rewritten.prepared,
                    error: &error,
                });
                Err(error)
            }
        }
    }

    // -- Builders ---------------------------------------------------------

    fn where_sql(&self, conditions: &Where) -> (String, Vec<Value>) {
        if conditions.is_empty() {
            return (String::new(), Vec::new());
        }
        let (fragment, params) = build_where(conditions, self.engine.dialect());
        (format!("WHERE {}", fragment), params)
    }

    /// First matching row as an assoc map.
    pub fn select(
        &mut self,
        table: &str,
        conditions: &Where,
        fields: &[&str],
    ) -> SqlResult<Option<HashMap<String, Value>>> {
        let (where_sql, params) = self.where_sql(conditions);
        let query = format!(
            "SELECT {} FROM {{{}}} {}FETCH FIRST 1 ROWS ONLY",
            select_fields(fields, self.engine.dialect()),
            table,
            where_sql
        );
        self.query(&query, params)?.fetch_assoc()
    }

    pub fn select_all(
        &mut self,
        table: &str,
        conditions: &Where,
        fields: &[&str],
        order: &[&str],
    ) -> SqlResult<QueryResult> {
        let (where_sql, params) = self.where_sql(conditions);
        let query = format!(
            "SELECT {} FROM {{{}}} {}{}",
            select_fields(fields, self.engine.dialect()),
            table,
            where_sql,
            order_by(order, self.engine.dialect())
        );
        self.query(query.trim_end(), params)
    }

    /// Rows where any of `search_fields` contains `term`, narrowed by
    /// `conditions`.
    pub fn search(
        &mut self,
        table: &str,
        search_fields: &[&str],
        term: &str,
        conditions: &Where,
        order: &[&str],
    ) -> SqlResult<QueryResult> {
        if search_fields.is_empty() {
            return Err(SqlError::invalid("search needs at least one field"));
        }
        let dialect = self.engine.dialect();
        let pattern = Value::String(format!("%{}%", term));
        let any_match = search_fields
            .iter()
            .map(|field| format!("{} LIKE ?", quote_field(field, dialect)))
            .collect::<Vec<_>>()
            .join(" OR ");
        let (where_sql, mut params) = self.where_sql(conditions);
        params.extend(std::iter::repeat(pattern).take(search_fields.len()));
        let where_sql = if where_sql.is_empty() {
            format!("WHERE ({}) ", any_match)
        } else {
            format!("{}AND ({}) ", where_sql, any_match)
        };
        let query = format!(
            "SELECT * FROM {{{}}} {}{}",
            table,
            where_sql,
            order_by(order, self.engine.dialect())
        );
        self.query(query.trim_end(), params)
    }

    /// One field of the first matching row.
    pub fn field_select(
        &mut self,
        table: &str,
        field: &str,
        conditions: &Where,
    ) -> SqlResult<Option<Value>> {
        let row = self.select(table, conditions, &[field])?;
        let column = field.rsplit('.').next().unwrap_or(field).to_lowercase();
        Ok(row.and_then(|mut row| row.remove(&column)))
    }

    /// One field of every matching row.
    pub fn field_select_all(
        &mut self,
        table: &str,
        field: &str,
        conditions: &Where,
        order: &[&str],
    ) -> SqlResult<Vec<Value>> {
        let mut result = self.select_all(table, conditions, &[field], order)?;
        let mut values = Vec::new();
        while let Some(row) = result.fetch_indexed()? {
            values.extend(row.into_iter().next());
        }
        Ok(values)
    }

    pub fn exists(&mut self, table: &str, conditions: &Where) -> SqlResult<bool> {
        let (where_sql, params) = self.where_sql(conditions);
        let query = format!(
            "SELECT 1 FROM {{{}}} {}FETCH FIRST 1 ROWS ONLY",
            table, where_sql
        );
        Ok(self.query(&query, params)?.fetch_raw()?.is_some())
    }

    pub fn count(&mut self, table: &str, conditions: &Where) -> SqlResult<i64> {
        let (where_sql, params) = self.where_sql(conditions);
        let query = format!("SELECT COUNT(*) FROM {{{}}} {}", table, where_sql);
        let row = self.query(query.trim_end(), params)?.fetch_raw()?;
        Ok(row
            .and_then(|row| row.first().and_then(Value::as_i64))
            .unwrap_or(0))
    }

    pub fn insert<K, V>(
        &mut self,
        table: &str,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> SqlResult<QueryResult>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (fields, params): (Vec<String>, Vec<Value>) = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        if fields.is_empty() {
            return Err(SqlError::invalid("insert needs at least one field"));
        }

        let dialect = self.engine.dialect();
        let columns = fields
            .iter()
            .map(|f| quote_field(f, dialect))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "INSERT INTO {{{}}} ({}) VALUES ({})",
            table,
            columns,
            vec!["?"; params.len()].join(", ")
        );
        self.query(&query, params)
    }

    /// Insert many rows; falls back to one insert per row when the engine
    /// has no native bulk path.
    pub fn bulk_insert(
        &mut self,
        table: &str,
        fields: &[String],
        rows: &[Vec<Value>],
    ) -> SqlResult<QueryResult> {
        if rows.is_empty() {
            return Ok(QueryResult::new(BufferedRows::statement(0, None)));
        }
        let rows: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| apply_null_policy(row.clone(), self.config.allow_nulls))
            .collect();
        let resolved = self.table_name(table);

        match self.engine.bulk_insert(&resolved, fields, &rows) {
            Ok(native) => Ok(QueryResult::from_boxed(native)),
            Err(error) if error.is_not_implemented() => {
                tracing::warn!(
                    table,
                    rows = rows.len(),
                    "no native bulk insert, inserting row by row"
                );
                let mut affected_rows = 0;
                let mut insert_id = None;
                for row in rows {
                    let result = self.insert(table, fields.iter().cloned().zip(row))?;
                    affected_rows += result.affected_rows();
                    insert_id = result.insert_id().or(insert_id);
                }
                Ok(QueryResult::new(BufferedRows::statement(
                    affected_rows,
                    insert_id,
                )))
            }
            Err(error) => {
                let summary = format!(
                    "INSERT INTO {} ({}) VALUES ... [{} rows]",
                    resolved,
                    fields.join(", "),
                    rows.len()
                );
                self.log.record(&QueryFailure {
                    query: &summary,
                    params: &[],
                    prepared: &summary,
                    error: &error,
                });
                Err(error)
            }
        }
    }

    /// Buffered inserter for `table`, flushed every `bulk_limit` rows.
    pub fn bulk(&mut self, table: &str) -> BulkInsert<'_> {
        let limit = self.config.bulk_limit;
        BulkInsert::new(self, table, limit)
    }

    pub fn update<K, V>(
        &mut self,
        table: &str,
        set: impl IntoIterator<Item = (K, V)>,
        conditions: &Where,
    ) -> SqlResult<QueryResult>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let dialect = self.engine.dialect();
        let (assignments, mut params): (Vec<String>, Vec<Value>) = set
            .into_iter()
            .map(|(k, v)| {
                let field: String = k.into();
                (format!("{} = ?", quote_field(&field, dialect)), v.into())
            })
            .unzip();
        if assignments.is_empty() {
            return Err(SqlError::invalid("update needs at least one field"));
        }

        let (where_sql, where_params) = self.where_sql(conditions);
        params.extend(where_params);
        let query = format!(
            "UPDATE {{{}}} SET {} {}",
            table,
            assignments.join(", "),
            where_sql
        );
        self.query(query.trim_end(), params)
    }

    /// Update the matching row, or insert the union of the equality
    /// conditions and `set` when nothing matches.
    pub fn insert_or_update<K, V>(
        &mut self,
        table: &str,
        set: impl IntoIterator<Item = (K, V)>,
        conditions: &Where,
    ) -> SqlResult<QueryResult>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let set: Vec<(String, Value)> = set.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        if self.exists(table, conditions)? {
            return self.update(table, set, conditions);
        }

        let mut row: Vec<(String, Value)> = conditions
            .iter()
            .filter_map(|(field, condition)| match condition {
                Condition::Equals(value) => Some((field.clone(), value.clone())),
                _ => None,
            })
            .filter(|(field, _)| !set.iter().any(|(f, _)| f == field))
            .collect();
        row.extend(set);
        self.insert(table, row)
    }

    pub fn delete(&mut self, table: &str, conditions: &Where) -> SqlResult<QueryResult> {
        let (where_sql, params) = self.where_sql(conditions);
        let query = format!("DELETE FROM {{{}}} {}", table, where_sql);
        self.query(query.trim_end(), params)
    }

    /// Auto-generated id of the row inserted by `result`.
    pub fn get_id(&mut self, result: &QueryResult) -> SqlResult<i64> {
        self.engine.last_insert_id(result)
    }

    // -- Transactions and locks -------------------------------------------

    pub fn start_transaction(&mut self) -> SqlResult<()> {
        self.engine.begin()?;
        self.in_transaction = true;
        Ok(())
    }

    pub fn commit(&mut self) -> SqlResult<()> {
        self.engine.commit()?;
        self.in_transaction = false;
        Ok(())
    }

    pub fn rollback(&mut self) -> SqlResult<()> {
        self.engine.rollback()?;
        self.in_transaction = false;
        Ok(())
    }

    /// Commit if a transaction is still open.
    pub fn end_transaction(&mut self) -> SqlResult<()> {
        if self.in_transaction {
            self.commit()?;
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Lock logical tables for writing, releasing any previous lock set.
    pub fn lock_tables(&mut self, tables: &[&str]) -> SqlResult<()> {
        if self.locked {
            self.unlock_tables()?;
        }
        let resolved: Vec<String> = tables.iter().map(|t| self.table_name(t)).collect();
        self.engine.lock_tables(&resolved)?;
        self.locked = true;
        Ok(())
    }

    pub fn unlock_tables(&mut self) -> SqlResult<()> {
        self.engine.unlock_tables()?;
        self.locked = false;
        Ok(())
    }

    // -- Introspection ----------------------------------------------------

    pub fn list_databases(&mut self) -> SqlResult<Vec<String>> {
        self.engine.list_databases()
    }

    pub fn list_tables(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.engine.list_tables(database)
    }

    pub fn list_views(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.engine.list_views(database)
    }
}

impl Drop for Sql {
    fn drop(&mut self) {
        if self.locked {
            if let Err(e) = self.unlock_tables() {
                tracing::debug!("unlock on drop failed: {}", e);
            }
        }
        if self.engine.disconnect_on_drop() && self.engine.is_connected() {
            if let Err(e) = self.engine.disconnect() {
                tracing::debug!("disconnect on drop failed: {}", e);
            }
        }
    }
}

/// Drain a live result into a replayable buffer.
fn materialize(result: &mut QueryResult) -> SqlResult<BufferedRows> {
    let columns = result.columns().to_vec();
    result.seek(0)?;
    let mut rows = Vec::new();
    while let Some(row) = result.fetch_raw()? {
        rows.push(row);
    }
    Ok(BufferedRows::new(columns, rows)
        .with_affected_rows(result.affected_rows())
        .with_insert_id(result.insert_id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableCatalog;
    use crate::result::NativeResult;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every statement it is asked to run.
    #[derive(Clone, Default)]
    struct Recorder {
        statements: Rc<RefCell<Vec<(String, Vec<Value>)>>>,
        rows: Rc<RefCell<Vec<BufferedRows>>>,
    }

    struct RecordingEngine {
        mode: EngineMode,
        recorder: Recorder,
        connected: bool,
    }

    impl Engine for RecordingEngine {
        fn mode(&self) -> EngineMode {
            self.mode
        }

        fn connect(&mut self) -> SqlResult<()> {
            self.connected = true;
            Ok(())
        }

        fn disconnect(&mut self) -> SqlResult<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn execute(
            &mut self,
            query: &str,
            params: &[Value],
            _prepared: &str,
        ) -> SqlResult<Box<dyn NativeResult>> {
            self.connected = true;
            self.recorder
                .statements
                .borrow_mut()
                .push((query.to_string(), params.to_vec()));
            let next = self.recorder.rows.borrow_mut().pop();
            Ok(Box::new(next.unwrap_or_default()))
        }

        fn lock_tables(&mut self, tables: &[String]) -> SqlResult<()> {
            self.statement(&format!("LOCK {}", tables.join(", ")))
        }

        fn unlock_tables(&mut self) -> SqlResult<()> {
            self.statement("UNLOCK")
        }
    }

    fn sql(mode: EngineMode) -> (Sql, Recorder) {
        let recorder = Recorder::default();
        let engine = RecordingEngine {
            mode,
            recorder: recorder.clone(),
            connected: false,
        };
        let config = SqlConfig::new(mode, "test://")
            .tables(TableCatalog::new().with_table("users", "app"));
        (Sql::with_engine(config, Box::new(engine)), recorder)
    }

    fn statements(recorder: &Recorder) -> Vec<String> {
        recorder
            .statements
            .borrow()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    #[test]
    fn test_lazy_connect() {
        let (mut sql, _) = sql(EngineMode::Mysql);
        assert!(!sql.is_connected());
        sql.query("SELECT 1", ()).unwrap();
        assert!(sql.is_connected());
    }

    #[test]
    fn test_builders_mysql() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        let conditions = Where::new().and("id", 4).and("role", vec!["a", "b"]);

        sql.select("users", &conditions, &[]).unwrap();
        sql.count("users", &Where::new()).unwrap();
        sql.update("users", [("name", "x")], &conditions).unwrap();
        sql.delete("users", &Where::new().and("id", 4)).unwrap();
        sql.insert("users", [("name", "y")]).unwrap();

        assert_eq!(
            statements(&recorder),
            vec![
                "SELECT * FROM `app`.`users` WHERE `id` = ? AND `role` IN (?,?) LIMIT 1",
                "SELECT COUNT(*) FROM `app`.`users`",
                "UPDATE `app`.`users` SET `name` = ? WHERE `id` = ? AND `role` IN (?,?)",
                "DELETE FROM `app`.`users` WHERE `id` = ?",
                "INSERT INTO `app`.`users` (`name`) VALUES (?)",
            ]
        );
        assert_eq!(
            recorder.statements.borrow()[2].1,
            vec![
                Value::from("x"),
                Value::Int(4),
                Value::from("a"),
                Value::from("b")
            ]
        );
    }

    #[test]
    fn test_builders_postgres_select_all() {
        let (mut sql, recorder) = sql(EngineMode::Postgres);
        sql.select_all(
            "users",
            &Where::new().and("age", Condition::not_less_than(18)),
            &["id", "name"],
            &["name desc"],
        )
        .unwrap();
        assert_eq!(
            statements(&recorder),
            vec![
                "SELECT \"id\", \"name\" FROM \"app\".\"users\" WHERE \"age\" >= ? ORDER BY \"name\" DESC"
            ]
        );
    }

    #[test]
    fn test_search() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        sql.search("users", &["name", "email"], "ann", &Where::new().and("active", 1), &["name"])
            .unwrap();
        sql.search("users", &["name"], "bob", &Where::new(), &[]).unwrap();
        assert!(sql.search("users", &[], "x", &Where::new(), &[]).is_err());

        assert_eq!(
            statements(&recorder),
            vec![
                "SELECT * FROM `app`.`users` WHERE `active` = ? AND (`name` LIKE ? OR `email` LIKE ?) ORDER BY `name`",
                "SELECT * FROM `app`.`users` WHERE (`name` LIKE ?)",
            ]
        );
        assert_eq!(
            recorder.statements.borrow()[0].1,
            vec![Value::Int(1), Value::from("%ann%"), Value::from("%ann%")]
        );
    }

    #[test]
    fn test_insert_or_update() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        // exists() sees an empty result, so the row is inserted.
        sql.insert_or_update(
            "users",
            [("name", "n")],
            &Where::new()
                .and("id", 9)
                .and("age", Condition::LessThan(3.into())),
        )
        .unwrap();
        let recorded = recorder.statements.borrow();
        assert_eq!(
            recorded[1].0,
            "INSERT INTO `app`.`users` (`id`, `name`) VALUES (?, ?)"
        );
        assert_eq!(recorded[1].1, vec![Value::Int(9), Value::from("n")]);
    }

    #[test]
    fn test_insert_or_update_existing() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        recorder
            .rows
            .borrow_mut()
            .push(BufferedRows::new(vec!["1".into()], vec![vec![Value::Int(1)]]));
        sql.insert_or_update("users", [("name", "n")], &Where::new().and("id", 9))
            .unwrap();
        assert_eq!(
            statements(&recorder)[1],
            "UPDATE `app`.`users` SET `name` = ? WHERE `id` = ?"
        );
    }

    #[test]
    fn test_lock_releases_previous() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        sql.lock_tables(&["users"]).unwrap();
        sql.lock_tables(&["orders"]).unwrap();
        drop(sql);
        assert_eq!(
            statements(&recorder),
            vec!["LOCK `app`.`users`", "UNLOCK", "LOCK `orders`", "UNLOCK"]
        );
    }

    #[test]
    fn test_bulk_fallback_row_by_row() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        let fields = vec!["a".to_string(), "b".to_string()];
        sql.bulk_insert(
            "users",
            &fields,
            &[
                vec![Value::Int(1), Value::Null],
                vec![Value::Int(2), Value::from("z")],
            ],
        )
        .unwrap();
        let recorded = recorder.statements.borrow();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].1, vec![Value::Int(1), Value::from("")]);
    }

    #[test]
    fn test_rewrite_uses_engine_quoting() {
        let (sql, _) = sql(EngineMode::Mysql);
        let out = sql.rewrite("SELECT ?", vec!["it's"]).unwrap();
        assert_eq!(out.prepared, "SELECT 'it\\'s'");
        assert_eq!(sql.table_name("users"), "`app`.`users`");
        assert_eq!(sql.quote_identifier("t.id"), "`t`.`id`");
    }

    #[test]
    fn test_placeholder_mismatch_never_executes() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        let err = sql.query("SELECT ?, ?", vec![1]).unwrap_err();
        assert!(matches!(err, SqlError::PlaceholderMismatch { .. }));
        assert!(statements(&recorder).is_empty());
    }

    #[test]
    fn test_transactions() {
        let (mut sql, recorder) = sql(EngineMode::Mysql);
        sql.start_transaction().unwrap();
        assert!(sql.in_transaction());
        sql.end_transaction().unwrap();
        sql.end_transaction().unwrap();
        assert_eq!(statements(&recorder), vec!["START TRANSACTION", "COMMIT"]);
    }
}
