use super::{Dialect, EngineMode};

/// PostgreSQL dialect.
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn mode(&self) -> EngineMode {
        EngineMode::Postgres
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn isnull_function(&self) -> &'static str {
        "COALESCE"
    }

    fn substr_function(&self) -> &'static str {
        "SUBSTRING"
    }
}
