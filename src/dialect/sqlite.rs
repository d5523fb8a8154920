use super::{Dialect, EngineMode};

/// SQLite dialect.
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn mode(&self) -> EngineMode {
        EngineMode::Sqlite
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    fn isnull_function(&self) -> &'static str {
        "IFNULL"
    }

    fn substr_function(&self) -> &'static str {
        "SUBSTR"
    }
}
