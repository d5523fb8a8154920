//! Neutral-dialect query rewriter.
//!
//! Turns a query written with `?`/`?name` markers, `{table}` markers and
//! canonical function names into engine-native SQL. Stages run in a fixed
//! order and none of them touches single-quoted literals:
//!
//! 1. identifier-quote translation ([`quotes`])
//! 2. function and pagination translation ([`functions`])
//! 3. `{table}` resolution ([`tables`])
//! 4. named-marker normalization ([`params`])
//! 5. list-parameter expansion ([`params`])
//! 6. null policy and literal substitution ([`prepare`])

pub mod functions;
pub mod literal;
pub mod params;
pub mod prepare;
pub mod quotes;
pub mod tables;

use crate::catalog::TableCatalog;
use crate::dialect::EngineMode;
use crate::error::SqlResult;
use crate::value::{Params, Value};

/// Output of one rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    /// Native query with one bare `?` per entry in `params`.
    pub query: String,
    /// Flat parameter list after null policy.
    pub params: Vec<Value>,
    /// `query` with every marker replaced by a quoted literal.
    pub prepared: String,
}

/// Rewrites neutral-dialect queries for one engine mode.
#[derive(Debug, Clone)]
pub struct Rewriter<'a> {
    mode: EngineMode,
    catalog: &'a TableCatalog,
    allow_nulls: bool,
}

impl<'a> Rewriter<'a> {
    pub fn new(mode: EngineMode, catalog: &'a TableCatalog) -> Self {
        Self {
            mode,
            catalog,
            allow_nulls: false,
        }
    }

    /// Keep NULL parameters as NULL instead of coercing them to `''`.
    pub fn allow_nulls(mut self, allow: bool) -> Self {
        self.allow_nulls = allow;
        self
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// Rewrite using the dialect's own string escaping.
    pub fn rewrite(&self, query: &str, params: impl Into<Params>) -> SqlResult<Rewritten> {
        let dialect = self.mode.dialect();
        self.rewrite_with(query, params.into(), &|s| dialect.escape_string(s))
    }

    /// Rewrite, quoting string literals in `prepared` with `quote`.
    pub fn rewrite_with(
        &self,
        query: &str,
        params: Params,
        quote: &dyn Fn(&str) -> String,
    ) -> SqlResult<Rewritten> {
        let query = self.rewrite_syntax(query);
        let (query, ordered) = params::normalize_named(&query, params, self.mode)?;
        let (query, flat) = params::expand_lists(&query, ordered, self.mode)?;
        let params = prepare::apply_null_policy(flat, self.allow_nulls);
        let prepared = prepare::prepare(&query, &params, self.mode, quote);

        Ok(Rewritten {
            query,
            params,
            prepared,
        })
    }

    /// Stages 1-3 only: quotes, functions and table markers.
    pub fn rewrite_syntax(&self, query: &str) -> String {
        let query = quotes::translate_quotes(query, self.mode);
        let query = functions::translate_functions(&query, self.mode.dialect());
        tables::substitute_tables(&query, self.catalog, self.mode)
    }

    /// Resolve one logical table name as a `{table}` marker would.
    pub fn table(&self, name: &str) -> String {
        tables::resolve_table(name, self.catalog, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqlError;
    use pretty_assertions::assert_eq;

    fn catalog() -> TableCatalog {
        TableCatalog::new().with_table("table1", "db1")
    }

    #[test]
    fn test_table_resolution_scenario() {
        let catalog = catalog();
        let out = Rewriter::new(EngineMode::Mysql, &catalog)
            .rewrite("SELECT * FROM {table1}", ())
            .unwrap();
        assert_eq!(out.query, "SELECT * FROM `db1`.`table1`");
        assert!(out.params.is_empty());
        assert_eq!(out.prepared, out.query);
    }

    #[test]
    fn test_named_parameter_scenario() {
        let catalog = catalog();
        let params: Params = [("a", "one"), ("b", "two")].into_iter().collect();
        let out = Rewriter::new(EngineMode::Mysql, &catalog)
            .rewrite("SELECT * FROM t WHERE field1=?a AND field2=?b", params)
            .unwrap();
        assert_eq!(out.query, "SELECT * FROM t WHERE field1=? AND field2=?");
        assert_eq!(out.params, vec![Value::from("one"), Value::from("two")]);
        assert_eq!(
            out.prepared,
            "SELECT * FROM t WHERE field1='one' AND field2='two'"
        );
    }

    #[test]
    fn test_null_coercion_scenario() {
        let catalog = catalog();
        let query = "UPDATE t SET a = ?";

        let out = Rewriter::new(EngineMode::Sqlite, &catalog)
            .rewrite(query, vec![Value::Null])
            .unwrap();
        assert_eq!(out.prepared, "UPDATE t SET a = ''");
        assert_eq!(out.params, vec![Value::from("")]);

        let out = Rewriter::new(EngineMode::Sqlite, &catalog)
            .allow_nulls(true)
            .rewrite(query, vec![Value::Null])
            .unwrap();
        assert_eq!(out.prepared, "UPDATE t SET a = NULL");
        assert_eq!(out.params, vec![Value::Null]);
    }

    #[test]
    fn test_full_pipeline() {
        let catalog = catalog();
        let params = Params::new()
            .push(vec!["x", "y"])
            .push(true)
            .push(vec![3]);
        let out = Rewriter::new(EngineMode::Postgres, &catalog)
            .rewrite(
                "SELECT `a`, ISNULL(b, 'ISNULL(`c`)') FROM {table1} \
                 WHERE a IN ? AND flag = ? AND id NOT IN (?) FETCH FIRST 5 ROWS ONLY",
                params,
            )
            .unwrap();
        assert_eq!(
            out.query,
            "SELECT \"a\", COALESCE(b, 'ISNULL(`c`)') FROM \"db1\".\"table1\" \
             WHERE a IN (?,?) AND flag = ? AND id <> ? LIMIT 5"
        );
        assert_eq!(
            out.params,
            vec![
                Value::from("x"),
                Value::from("y"),
                Value::Bool(true),
                Value::Int(3)
            ]
        );
        assert_eq!(
            out.prepared,
            "SELECT \"a\", COALESCE(b, 'ISNULL(`c`)') FROM \"db1\".\"table1\" \
             WHERE a IN ('x','y') AND flag = 1 AND id <> 3 LIMIT 5"
        );
    }

    #[test]
    fn test_mismatch_fails_fast() {
        let catalog = catalog();
        let err = Rewriter::new(EngineMode::Mysql, &catalog)
            .rewrite("SELECT ? , ?", vec![1])
            .unwrap_err();
        assert!(matches!(err, SqlError::PlaceholderMismatch { .. }));
    }

    #[test]
    fn test_custom_quoter() {
        let catalog = catalog();
        let out = Rewriter::new(EngineMode::Mysql, &catalog)
            .rewrite_with("SELECT ?", Params::new().push("v"), &|s| format!("<{s}>"))
            .unwrap();
        assert_eq!(out.prepared, "SELECT <v>");
    }

    #[test]
    fn test_mysql_escaped_literal_is_opaque() {
        let catalog = catalog();
        let rewriter = Rewriter::new(EngineMode::Mysql, &catalog);
        let value = EngineMode::Mysql.dialect().escape_string("it's ?");
        let out = rewriter
            .rewrite(
                &format!("SELECT * FROM t WHERE a = {value} AND b IN ?"),
                vec![vec![1, 2]],
            )
            .unwrap();
        assert_eq!(out.query, r"SELECT * FROM t WHERE a = 'it\'s ?' AND b IN (?,?)");
        assert_eq!(out.prepared, r"SELECT * FROM t WHERE a = 'it\'s ?' AND b IN (1,2)");

        let query = r#"SELECT * FROM {table1} WHERE a = 'x\' "y" {table1} ' AND b = ?"#;
        let out = rewriter.rewrite(query, vec![1]).unwrap();
        assert_eq!(
            out.query,
            r#"SELECT * FROM `db1`.`table1` WHERE a = 'x\' "y" {table1} ' AND b = ?"#
        );
        assert_eq!(out.params, vec![Value::Int(1)]);
    }
}
