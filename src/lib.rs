//! # polysql: one query dialect, many engines
//!
//! Write a query once in a neutral dialect and run it on MySQL,
//! PostgreSQL or SQLite:
//!
//! - `?` and `?name` placeholders
//! - `{table}` markers resolved through a [`TableCatalog`](catalog::TableCatalog)
//! - canonical `ISNULL(..)`, `SUBSTR(..)` and `FETCH FIRST n ROWS ONLY`
//! - list parameters that expand `IN ?` into `IN (?,?,...)`
//!
//! Single-quoted literals are never rewritten.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use polysql::prelude::*;
//!
//! let config = SqlConfig::new(EngineMode::Sqlite, "sqlite::memory:");
//! let mut sql = Sql::new(config)?;
//!
//! let mut users = sql.query(
//!     "SELECT * FROM {users} WHERE id IN ?ids AND name <> ?name",
//!     Params::new().named("ids", vec![1, 2, 3]).named("name", "root"),
//! )?;
//! while let Some(row) = users.fetch_assoc()? {
//!     println!("{:?}", row);
//! }
//! ```
//!
//! ## Dry run
//!
//! ```
//! use polysql::prelude::*;
//!
//! let catalog = TableCatalog::new().with_table("table1", "db1");
//! let out = Rewriter::new(EngineMode::Mysql, &catalog)
//!     .rewrite("SELECT * FROM {table1} WHERE a IN ?", vec![vec![1, 2]])
//!     .unwrap();
//! assert_eq!(out.query, "SELECT * FROM `db1`.`table1` WHERE a IN (?,?)");
//! assert_eq!(out.prepared, "SELECT * FROM `db1`.`table1` WHERE a IN (1,2)");
//! ```

pub mod bulk;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod result;
pub mod rewriter;
pub mod sql;
pub mod value;
pub mod where_clause;

pub mod prelude {
    pub use crate::bulk::BulkInsert;
    pub use crate::cache::{MemoryCache, ResultCache};
    pub use crate::catalog::{CatalogEntry, TableCatalog};
    pub use crate::config::SqlConfig;
    pub use crate::dialect::{Dialect, EngineMode};
    pub use crate::engine::Engine;
    pub use crate::error::*;
    pub use crate::result::{FetchStyle, Fetched, KeyValue, QueryResult};
    pub use crate::rewriter::{Rewriter, Rewritten};
    pub use crate::sql::Sql;
    pub use crate::value::{Param, Params, Value};
    pub use crate::where_clause::{Condition, Where};
}

/// Rewrite a neutral-dialect query for `mode` without a catalog.
///
/// # Example
///
/// ```
/// use polysql::{dialect::EngineMode, rewrite};
///
/// let out = rewrite("SELECT ISNULL(a, 0) FROM t WHERE b = ?", vec!["x"], EngineMode::Postgres).unwrap();
/// assert_eq!(out.query, "SELECT COALESCE(a, 0) FROM t WHERE b = ?");
/// ```
pub fn rewrite(
    query: &str,
    params: impl Into<value::Params>,
    mode: dialect::EngineMode,
) -> error::SqlResult<rewriter::Rewritten> {
    let catalog = catalog::TableCatalog::new();
    rewriter::Rewriter::new(mode, &catalog).rewrite(query, params)
}
