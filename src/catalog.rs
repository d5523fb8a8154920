//! Logical table → database mapping used to resolve `{table}` markers.

use crate::dialect::EngineMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where one logical table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    /// The same database for every engine mode.
    Database(String),
    /// Keyed by mode name, with an optional `default` fallback.
    PerMode(HashMap<String, String>),
}

/// Read-only table catalog, built once at configuration time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `table` to `database` for every mode.
    pub fn with_table(mut self, table: impl Into<String>, database: impl Into<String>) -> Self {
        self.entries
            .insert(table.into(), CatalogEntry::Database(database.into()));
        self
    }

    /// Map `table` to `database` for one mode only (`mode` may be `"default"`).
    pub fn with_mode_table(
        mut self,
        table: impl Into<String>,
        mode: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        let table = table.into();
        let mut modes = match self.entries.remove(&table) {
            Some(CatalogEntry::PerMode(modes)) => modes,
            Some(CatalogEntry::Database(db)) => HashMap::from([("default".to_string(), db)]),
            None => HashMap::new(),
        };
        modes.insert(mode.into(), database.into());
        self.entries.insert(table, CatalogEntry::PerMode(modes));
        self
    }

    /// The database holding `table` under `mode`, if catalogued.
    pub fn database_for(&self, table: &str, mode: EngineMode) -> Option<&str> {
        match self.entries.get(table)? {
            CatalogEntry::Database(db) => Some(db),
            CatalogEntry::PerMode(modes) => modes
                .get(mode.name())
                .or_else(|| modes.get("default"))
                .map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
