//! SQLite engine. Attached databases stand in for logical databases.

use super::driver::SqlxConnection;
use super::{Engine, column_strings};
use crate::dialect::EngineMode;
use crate::error::SqlResult;
use crate::result::NativeResult;
use crate::value::Value;

pub struct SqliteEngine {
    conn: SqlxConnection,
}

impl SqliteEngine {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            conn: SqlxConnection::new(url),
        }
    }

    /// In-memory database, handy for tests and dry runs.
    pub fn memory() -> Self {
        Self::new("sqlite::memory:")
    }

    fn master_entries(&mut self, database: Option<&str>, kind: &str) -> SqlResult<Vec<String>> {
        let schema = self.quote_identifier(database.unwrap_or("main"));
        let sql = format!(
            "SELECT name FROM {schema}.sqlite_master \
             WHERE type = '{kind}' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        );
        let result = self.execute(&sql, &[], &sql)?;
        column_strings(result, None)
    }
}

impl Engine for SqliteEngine {
    fn mode(&self) -> EngineMode {
        EngineMode::Sqlite
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
        Ok(Box::new(self.conn.execute(query, params)?))
    }

    fn list_databases(&mut self) -> SqlResult<Vec<String>> {
        let result = self.execute("PRAGMA database_list", &[], "PRAGMA database_list")?;
        column_strings(result, Some("name"))
    }

    fn list_tables(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.master_entries(database, "table")
    }

    fn list_views(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.master_entries(database, "view")
    }
}
