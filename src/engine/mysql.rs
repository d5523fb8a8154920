//! MySQL / MariaDB engine.

use super::driver::SqlxConnection;
use super::{Engine, chunked_bulk_insert, column_strings};
use crate::dialect::EngineMode;
use crate::error::SqlResult;
use crate::result::NativeResult;
use crate::value::Value;

pub struct MysqlEngine {
    conn: SqlxConnection,
}

impl MysqlEngine {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            conn: SqlxConnection::new(url),
        }
    }

    fn show_tables(&mut self, database: Option<&str>, table_type: &str) -> SqlResult<Vec<String>> {
        let from = database
            .map(|db| format!(" FROM {}", self.quote_identifier(db)))
            .unwrap_or_default();
        let sql = format!("SHOW FULL TABLES{from} WHERE Table_type = '{table_type}'");
        let result = self.execute(&sql, &[], &sql)?;
        column_strings(result, None)
    }
}

impl Engine for MysqlEngine {
    fn mode(&self) -> EngineMode {
        EngineMode::Mysql
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

    fn lock_tables(&mut self, tables: &[String]) -> SqlResult<()> {
        let targets = tables
            .iter()
            .map(|table| format!("{} WRITE", table))
            .collect::<Vec<_>>()
            .join(", ");
        self.statement(&format!("LOCK TABLES {}", targets))
    }

    fn unlock_tables(&mut self) -> SqlResult<()> {
        self.statement("UNLOCK TABLES")
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
        let result = self.execute("SHOW DATABASES", &[], "SHOW DATABASES")?;
        column_strings(result, None)
    }

    fn list_tables(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.show_tables(database, "BASE TABLE")
    }

    fn list_views(&mut self, database: Option<&str>) -> SqlResult<Vec<String>> {
        self.show_tables(database, "VIEW")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_construction() {
        let engine = MysqlEngine::new("mysql://root@127.0.0.1:1/none");
        assert!(!engine.is_connected());
        assert_eq!(engine.mode(), EngineMode::Mysql);
        assert_eq!(engine.quote_identifier("a`b"), "`a``b`");
        assert_eq!(engine.quote_value(&Value::from("it's")), "'it\\'s'");
    }
}
