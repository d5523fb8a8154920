//! Per-engine SQL dialects.
//!
//! A [`Dialect`] holds every dialect-specific string the rewriter needs:
//! identifier quotes, string escaping, native function names, pagination
//! and placeholder syntax. Engines add connection behaviour on top.

mod mysql;
mod odbc;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use odbc::OdbcDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::error::SqlError;
use serde::{Deserialize, Serialize};

/// Supported engine modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgresql", alias = "pgsql")]
    Postgres,
    Sqlite,
    #[serde(alias = "mssql")]
    Odbc,
}

impl EngineMode {
    /// Every known mode, in quote-translation order.
    pub const ALL: [EngineMode; 4] = [
        EngineMode::Mysql,
        EngineMode::Postgres,
        EngineMode::Sqlite,
        EngineMode::Odbc,
    ];

    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            EngineMode::Mysql => &MysqlDialect,
            EngineMode::Postgres => &PostgresDialect,
            EngineMode::Sqlite => &SqliteDialect,
            EngineMode::Odbc => &OdbcDialect,
        }
    }

    /// The lowercase mode name, also used as the catalog key.
    pub fn name(&self) -> &'static str {
        match self {
            EngineMode::Mysql => "mysql",
            EngineMode::Postgres => "postgres",
            EngineMode::Sqlite => "sqlite",
            EngineMode::Odbc => "odbc",
        }
    }
}

impl Default for EngineMode {
    fn default() -> Self {
        Self::Mysql
    }
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EngineMode {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(EngineMode::Mysql),
            "postgres" | "postgresql" | "pgsql" => Ok(EngineMode::Postgres),
            "sqlite" => Ok(EngineMode::Sqlite),
            "odbc" | "mssql" => Ok(EngineMode::Odbc),
            other => Err(SqlError::Config(format!("unknown engine mode '{other}'"))),
        }
    }
}

/// Dialect-specific SQL strings for one engine.
pub trait Dialect: Send + Sync {
    fn mode(&self) -> EngineMode;

    /// Opening and closing identifier quote characters.
    fn quote_pair(&self) -> (char, char);

    /// Quote an identifier, doubling any embedded closing quote.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.quote_pair();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Quote and escape a string literal.
    fn escape_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Native bound-parameter marker for the 1-based `index`.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Native spelling of the canonical `ISNULL(a, b)`.
    fn isnull_function(&self) -> &'static str;

    /// Native spelling of the canonical `SUBSTR(s, start, len)`.
    fn substr_function(&self) -> &'static str;

    /// Native replacement for `FETCH FIRST n ROWS ONLY`; `None` keeps it.
    fn limit_clause(&self, rows: u64) -> Option<String> {
        Some(format!("LIMIT {}", rows))
    }

    /// Schema segment placed between database and table in qualified names.
    fn schema_segment(&self) -> Option<&'static str> {
        None
    }

    fn begin_statement(&self) -> &'static str {
        "BEGIN"
    }

    /// Whether `\` escapes the next character inside string literals.
    fn backslash_escapes(&self) -> bool {
        false
    }
}
