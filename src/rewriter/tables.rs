//! Stage 3: `{table}` marker resolution.

use super::literal::map_code;
use crate::catalog::TableCatalog;
use crate::dialect::EngineMode;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TABLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_$.]*)\}").expect("static pattern"));

/// Resolve one logical table name to a quoted, qualified reference.
///
/// Catalogued tables become `db.[schema.]table`. Uncatalogued names that
/// already contain a `.` are assumed qualified and pass through as-is;
/// anything else is just quoted.
pub fn resolve_table(table: &str, catalog: &TableCatalog, mode: EngineMode) -> String {
    let dialect = mode.dialect();
    match catalog.database_for(table, mode) {
        Some(database) => {
            let mut parts = vec![dialect.quote_identifier(database)];
            if let Some(schema) = dialect.schema_segment() {
                parts.push(dialect.quote_identifier(schema));
            }
            parts.push(dialect.quote_identifier(table));
            parts.join(".")
        }
        None if table.contains('.') => table.to_string(),
        None => dialect.quote_identifier(table),
    }
}

/// Replace every `{table}` marker outside literals.
pub fn substitute_tables(query: &str, catalog: &TableCatalog, mode: EngineMode) -> String {
    map_code(query, mode, |code| {
        TABLE_MARKER
            .replace_all(code, |caps: &Captures| resolve_table(&caps[1], catalog, mode))
            .into_owned()
    })
}
