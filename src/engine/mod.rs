//! Engine capability interface and backend registry.
//!
//! An [`Engine`] owns one native connection and executes already rewritten
//! statements. Only connection handling and `execute` are mandatory; every
//! other capability has a default that either builds on `execute` or
//! reports [`SqlError::NotImplemented`].

pub mod driver;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MysqlEngine;
pub use postgres::PostgresEngine;
pub use sqlite::SqliteEngine;

use crate::dialect::{Dialect, EngineMode};
use crate::error::{SqlError, SqlResult};
use crate::result::{BufferedRows, NativeResult, QueryResult};
use crate::rewriter::prepare;
use crate::value::Value;
use crate::where_clause::quote_field;

/// Most drivers cap bound parameters per statement at 65535.
pub const MAX_BOUND_PARAMS: usize = 65_535;

/// Backend capability set.
pub trait Engine {
    fn mode(&self) -> EngineMode;

    /// Open the native connection; a no-op when already open.
    fn connect(&mut self) -> SqlResult<()>;

    fn disconnect(&mut self) -> SqlResult<()>;

    fn is_connected(&self) -> bool;

    /// Whether dropping the facade should close the connection.
    ///
    /// Engines whose driver shares connections across instances return
    /// `false`.
    fn disconnect_on_drop(&self) -> bool {
        true
    }

    /// Execute a rewritten statement.
    ///
    /// `query` carries one bare `?` per entry of `params`; `prepared` is the
    /// same statement with the values inlined, for engines that cannot bind.
    fn execute(
        &mut self,
        query: &str,
        params: &[Value],
        prepared: &str,
    ) -> SqlResult<Box<dyn NativeResult>>;

    fn dialect(&self) -> &'static dyn Dialect {
        self.mode().dialect()
    }

    fn quote_identifier(&self, name: &str) -> String {
        self.dialect().quote_identifier(name)
    }

    fn quote_value(&self, value: &Value) -> String {
        let dialect = self.dialect();
        prepare::literal(value, &|s| dialect.escape_string(s))
    }

    /// Auto-generated id of the row inserted by `result`.
    fn last_insert_id(&mut self, result: &QueryResult) -> SqlResult<i64> {
        result
            .insert_id()
            .ok_or_else(|| SqlError::not_implemented("last_insert_id", self.mode()))
    }

    fn begin(&mut self) -> SqlResult<()> {
        self.statement(self.dialect().begin_statement())
    }

    fn commit(&mut self) -> SqlResult<()> {
        self.statement("COMMIT")
    }

    fn rollback(&mut self) -> SqlResult<()> {
        self.statement("ROLLBACK")
    }

    /// Lock already resolved table references for writing.
    fn lock_tables(&mut self, tables: &[String]) -> SqlResult<()> {
        let _ = tables;
        Err(SqlError::not_implemented("lock_tables", self.mode()))
    }

    fn unlock_tables(&mut self) -> SqlResult<()> {
        Err(SqlError::not_implemented("unlock_tables", self.mode()))
    }

    /// Insert many rows with one native statement per chunk.
    ///
    /// `table` is already resolved; every row has one value per field.
    fn bulk_insert(
        &mut self,
        table: &str,
        fields: &[String],
        rows: &[Vec<Value>],
    ) -> SqlResult<Box<dyn NativeResult>> {
        let _ = (table, fields, rows);
        Err(SqlError::not_implemented("bulk_insert", self.mode()))
    }

    fn list_databases(&mut self) -> SqlResult<Vec<String>> {
        Err(SqlError::not_implemented("list_databases", self.mode()))
    }

    fn list_tables(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        let _ = database;
        Err(SqlError::not_implemented("list_tables", self.mode()))
    }

    fn list_views(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        let _ = database;
        Err(SqlError::not_implemented("list_views", self.mode()))
    }

    /// Run a parameterless statement and discard its result.
    fn statement(&mut self, sql: &str) -> SqlResult<()> {
        self.execute(sql, &[], sql).map(drop)
    }
}

/// Build the engine for `mode`. No connection is attempted.
pub fn engine_for(mode: EngineMode, url: &str) -> SqlResult<Box<dyn Engine>> {
    match mode {
        EngineMode::Mysql => Ok(Box::new(MysqlEngine::new(url))),
        EngineMode::Postgres => Ok(Box::new(PostgresEngine::new(url))),
        EngineMode::Sqlite => Ok(Box::new(SqliteEngine::new(url))),
        EngineMode::Odbc => Err(SqlError::not_implemented("native connections", mode)),
    }
}

/// Build `INSERT INTO table (fields) VALUES (?,..),(?,..)` for `rows`.
pub fn multi_row_insert(
    dialect: &dyn Dialect,
    table: &str,
    fields: &[String],
    rows: &[Vec<Value>],
) -> SqlResult<(String, Vec<Value>)> {
    if fields.is_empty() || rows.is_empty() {
        return Err(SqlError::invalid("bulk insert needs at least one field and one row"));
    }
    if let Some(bad) = rows.iter().find(|row| row.len() != fields.len()) {
        return Err(SqlError::invalid(format!(
            "bulk insert row has {} values for {} fields",
            bad.len(),
            fields.len()
        )));
    }

    let columns = fields
        .iter()
        .map(|f| quote_field(f, dialect))
        .collect::<Vec<_>>()
        .join(", ");
    let tuple = format!("({})", vec!["?"; fields.len()].join(","));
    let values = vec![tuple.as_str(); rows.len()].join(",");

    let sql = format!("INSERT INTO {} ({}) VALUES {}", table, columns, values);
    Ok((sql, rows.iter().flatten().cloned().collect()))
}

/// Multi-row bulk insert split so each statement stays under the bind limit.
pub(crate) fn chunked_bulk_insert<E: Engine + ?Sized>(
    engine: &mut E,
    table: &str,
    fields: &[String],
    rows: &[Vec<Value>],
) -> SqlResult<Box<dyn NativeResult>> {
    let per_statement = (MAX_BOUND_PARAMS / fields.len().max(1)).max(1);
    let mut affected_rows = 0;
    let mut insert_id = None;

    for chunk in rows.chunks(per_statement) {
        let (sql, params) = multi_row_insert(engine.dialect(), table, fields, chunk)?;
        let result = engine.execute(&sql, &params, &sql)?;
        affected_rows += result.affected_rows();
        insert_id = result.insert_id().or(insert_id);
    }

    Ok(Box::new(BufferedRows::statement(affected_rows, insert_id)))
}

/// Collect one column of a result as strings; the first column when
/// `column` is `None` or not present.
pub(crate) fn column_strings(
    mut result: Box<dyn NativeResult>,
    column: Option<&str>,
) -> SqlResult<Vec<String>> {
    let index = column
        .and_then(|name| {
            result
                .columns()
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
        })
        .unwrap_or(0);

    let mut out = Vec::new();
    while let Some(row) = result.next_row()? {
        if let Some(value) = row.into_iter().nth(index) {
            out.push(value.to_string());
        }
    }
    Ok(out)
}
