//! Error types for polysql.

use thiserror::Error;

/// The main error type for polysql operations.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Failed to establish (or build the runtime for) a native connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine rejected a statement.
    #[error("Query error{}: {}", code_suffix(.code), .message)]
    Query {
        code: Option<String>,
        message: String,
    },

    /// The rewritten query and the flattened parameters disagree.
    #[error("Placeholder mismatch: query has {placeholders} placeholder(s) but {params} parameter(s) were supplied")]
    PlaceholderMismatch { placeholders: usize, params: usize },

    /// The active engine has no support for the requested capability.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Malformed caller input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlError {
    /// Create a query error without a native error code.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            code: None,
            message: message.into(),
        }
    }

    /// Create a not-implemented error naming the capability and engine.
    pub fn not_implemented(capability: &str, engine: impl std::fmt::Display) -> Self {
        Self::NotImplemented(format!("{capability} is not supported by the {engine} engine"))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether this error means the capability is absent (as opposed to failing).
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

impl From<sqlx::Error> for SqlError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Query {
                code: db.code().map(|c| c.into_owned()),
                message: db.message().to_string(),
            },
            other => Self::query(other.to_string()),
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" [{c}]")).unwrap_or_default()
}

/// Result type alias for polysql operations.
pub type SqlResult<T> = Result<T, SqlError>;
