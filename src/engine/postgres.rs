//! PostgreSQL engine.
//!
//! Statements arrive with bare `?` markers and are renumbered to `$n`
//! before binding. Logical databases map onto schemas.

use super::driver::SqlxConnection;
use super::{Engine, chunked_bulk_insert, column_strings};
use crate::dialect::EngineMode;
use crate::error::{SqlError, SqlResult};
use crate::result::{NativeResult, QueryResult};
use crate::rewriter::literal::number_placeholders;
use crate::value::Value;

pub struct PostgresEngine {
    conn: SqlxConnection,
}

impl PostgresEngine {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            conn: SqlxConnection::new(url),
        }
    }

    /// Rewrite `?` markers to `$1, $2, ...`.
    pub fn native_query(&self, query: &str) -> String {
        let dialect = self.dialect();
        number_placeholders(query, EngineMode::Postgres, |index| dialect.placeholder(index))
    }

    fn information_schema(
        &mut self,
        view: &str,
        filter: &str,
        database: Option<&str>,
    ) -> SqlResult<Vec<String>> {
        let schema = match database {
            Some(_) => "$1",
            None => "current_schema()",
        };
        let sql = format!(
            "SELECT table_name FROM information_schema.{view} \
             WHERE table_schema = {schema}{filter} ORDER BY table_name"
        );
        let params: Vec<Value> = database.map(Value::from).into_iter().collect();
        let result = self.conn.execute(&sql, &params)?;
        column_strings(Box::new(result), None)
    }
}

impl Engine for PostgresEngine {
    fn mode(&self) -> EngineMode {
        EngineMode::Postgres
    }

    fn connect(&mut self) -> SqlResult<()> {
        self.conn.connect()
    }

    fn disconnect(&mut self) -> SqlResult<()> {
        self.conn.disconnect()
    }

    fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    fn execute(
        &mut self,
        query: &str,
        params: &[Value],
        _prepared: &str,
    ) -> SqlResult<Box<dyn NativeResult>> {
        if params.is_empty() {
            return Ok(Box::new(self.conn.execute(query, params)?));
        }
        let native = self.native_query(query);
        Ok(Box::new(self.conn.execute(&native, params)?))
    }

    fn last_insert_id(&mut self, result: &QueryResult) -> SqlResult<i64> {
        if let Some(id) = result.insert_id() {
            return Ok(id);
        }
        let mut ids = self.conn.execute("SELECT lastval()", &[])?;
        let id = ids.next_row()?.and_then(|row| row.first().and_then(Value::as_i64));
        id.ok_or_else(|| SqlError::query("lastval() returned no id"))
    }

    fn bulk_insert(
        &mut self,
        table: &str,
        fields: &[String],
        rows: &[Vec<Value>],
    ) -> SqlResult<Box<dyn NativeResult>> {
        chunked_bulk_insert(self, table, fields, rows)
    }

    fn list_databases(&mut self) -> SqlResult<Vec<String>> {
        let sql = "SELECT datname FROM pg_database WHERE datistemplate = false ORDER BY datname";
        let result = self.conn.execute(sql, &[])?;
        column_strings(Box::new(result), None)
    }

    fn list_tables(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.information_schema("tables", " AND table_type = 'BASE TABLE'", database)
    }

    fn list_views(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.information_schema("views", "", database)
    }
}
