use super::{Dialect, EngineMode};

/// ODBC dialect (SQL Server flavoured).
pub struct OdbcDialect;

impl Dialect for OdbcDialect {
    fn mode(&self) -> EngineMode {
        EngineMode::Odbc
    }

    fn quote_pair(&self) -> (char, char) {
        ('[', ']')
    }

    fn isnull_function(&self) -> &'static str {
        "ISNULL"
    }

    fn substr_function(&self) -> &'static str {
        "SUBSTRING"
    }

    // FETCH FIRST is already native.
    fn limit_clause(&self, _rows: u64) -> Option<String> {
        None
    }

    fn schema_segment(&self) -> Option<&'static str> {
        Some("dbo")
    }
}
