//! Native result sets as seen by the cursor.

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One untouched row, in column order.
pub type Row = Vec<Value>;

/// The minimal surface a backend result set has to offer.
///
/// Only forward iteration and rewinding are required. Random seek and a
/// native row count are optional; [`QueryResult`](super::QueryResult)
/// replays rows when they are missing.
pub trait NativeResult {
    fn columns(&self) -> &[String];

    /// Next row, or `None` once the set is exhausted.
    fn next_row(&mut self) -> SqlResult<Option<Row>>;

    /// Reset to before the first row.
    fn rewind(&mut self) -> SqlResult<()>;

    /// Position so that the next `next_row` returns row `position`.
    fn seek(&mut self, position: usize) -> SqlResult<()> {
        let _ = position;
        Err(SqlError::NotImplemented("native seek".to_string()))
    }

    fn row_count(&self) -> Option<usize> {
        None
    }

    fn affected_rows(&self) -> u64 {
        0
    }

    fn insert_id(&self) -> Option<i64> {
        None
    }

    /// Release native resources.
    fn free(&mut self) {}
}

/// A fully materialized result set.
///
/// Engines hand these out for every statement, and the result cache
/// stores and replays them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferedRows {
    columns: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    position: usize,
    #[serde(default)]
    affected_rows: u64,
    #[serde(default)]
    insert_id: Option<i64>,
}

impl BufferedRows {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// An empty set for statements that return no rows.
    pub fn statement(affected_rows: u64, insert_id: Option<i64>) -> Self {
        Self {
            affected_rows,
            insert_id,
            ..Self::default()
        }
    }

    pub fn with_affected_rows(mut self, affected_rows: u64) -> Self {
        self.affected_rows = affected_rows;
        self
    }

    pub fn with_insert_id(mut self, insert_id: Option<i64>) -> Self {
        self.insert_id = insert_id;
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl NativeResult for BufferedRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> SqlResult<Option<Row>> {
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    fn rewind(&mut self) -> SqlResult<()> {
        self.position = 0;
        Ok(())
    }

    fn seek(&mut self, position: usize) -> SqlResult<()> {
        if position > self.rows.len() {
            return Err(SqlError::invalid(format!(
                "cannot seek to row {position} of {}",
                self.rows.len()
            )));
        }
        self.position = position;
        Ok(())
    }

    fn row_count(&self) -> Option<usize> {
        Some(self.rows.len())
    }

    fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    fn insert_id(&self) -> Option<i64> {
        self.insert_id
    }

    fn free(&mut self) {
        self.rows = Vec::new();
        self.position = 0;
    }
}
