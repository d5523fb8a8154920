//! Seekable result cursor.
//!
//! [`QueryResult`] wraps any [`NativeResult`] and gives every backend the
//! same fetch, seek and count behavior. Backends without random access are
//! rewound and replayed; backends without a row count are scanned once and
//! restored to their previous position.

pub mod native;

pub use native::{BufferedRows, NativeResult, Row};

use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use std::collections::HashMap;

/// Shape of the rows returned by [`QueryResult::fetch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStyle {
    /// Column name (lowercased) to value, strings right-trimmed.
    #[default]
    Assoc,
    /// Values in column order, strings right-trimmed.
    Indexed,
    /// The native row, untouched.
    Raw,
}

/// One fetched row.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Assoc(HashMap<String, Value>),
    Indexed(Vec<Value>),
    Raw(Row),
}

impl Fetched {
    /// Look a value up by column name (assoc rows only).
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            Fetched::Assoc(map) => map.get(&column.to_lowercase()),
            _ => None,
        }
    }

    pub fn into_assoc(self) -> Option<HashMap<String, Value>> {
        match self {
            Fetched::Assoc(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Fetched::Assoc(map) => map.into_values().collect(),
            Fetched::Indexed(values) | Fetched::Raw(values) => values,
        }
    }
}

/// One item of a [`KeyValues`] sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Single(Value),
    Pair(Value, Value),
}

/// Cursor over one result set.
pub struct QueryResult {
    native: Box<dyn NativeResult>,
    position: usize,
    style: FetchStyle,
    row_count: Option<usize>,
    freed: bool,
}

impl std::fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("columns", &self.native.columns())
            .field("position", &self.position)
            .field("style", &self.style)
            .field("freed", &self.freed)
            .finish()
    }
}

impl QueryResult {
    pub fn new(native: impl NativeResult + 'static) -> Self {
        Self::from_boxed(Box::new(native))
    }

    pub fn from_boxed(native: Box<dyn NativeResult>) -> Self {
        Self {
            native,
            position: 0,
            style: FetchStyle::default(),
            row_count: None,
            freed: false,
        }
    }

    pub fn set_fetch_style(&mut self, style: FetchStyle) {
        self.style = style;
    }

    pub fn with_fetch_style(mut self, style: FetchStyle) -> Self {
        self.style = style;
        self
    }

    pub fn fetch_style(&self) -> FetchStyle {
        self.style
    }

    /// Current 0-based position: the index of the row the next fetch returns.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn columns(&self) -> &[String] {
        if self.freed { &[] } else { self.native.columns() }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    pub fn affected_rows(&self) -> u64 {
        self.native.affected_rows()
    }

    pub fn insert_id(&self) -> Option<i64> {
        self.native.insert_id()
    }

    /// Fetch the next row in the selected style.
    pub fn fetch(&mut self) -> SqlResult<Option<Fetched>> {
        self.fetch_as(self.style)
    }

    /// Fetch the next row in `style`; `None` leaves the position unchanged.
    pub fn fetch_as(&mut self, style: FetchStyle) -> SqlResult<Option<Fetched>> {
        let Some(row) = self.next_native()? else {
            return Ok(None);
        };
        let fetched = match style {
            FetchStyle::Raw => Fetched::Raw(row),
            FetchStyle::Indexed => Fetched::Indexed(row.into_iter().map(trim_value).collect()),
            FetchStyle::Assoc => Fetched::Assoc(
                self.native
                    .columns()
                    .iter()
                    .map(|c| c.to_lowercase())
                    .zip(row.into_iter().map(trim_value))
                    .collect(),
            ),
        };
        Ok(Some(fetched))
    }

    pub fn fetch_assoc(&mut self) -> SqlResult<Option<HashMap<String, Value>>> {
        Ok(self.fetch_as(FetchStyle::Assoc)?.and_then(Fetched::into_assoc))
    }

    pub fn fetch_indexed(&mut self) -> SqlResult<Option<Vec<Value>>> {
        Ok(self.fetch_as(FetchStyle::Indexed)?.map(Fetched::into_values))
    }

    pub fn fetch_raw(&mut self) -> SqlResult<Option<Row>> {
        Ok(self.fetch_as(FetchStyle::Raw)?.map(Fetched::into_values))
    }

    /// All remaining rows as assoc maps.
    pub fn fetch_all_assoc(&mut self) -> SqlResult<Vec<HashMap<String, Value>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_assoc()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Seek to `row`, then read `column` from it.
    pub fn value_at(&mut self, row: usize, column: &str) -> SqlResult<Option<Value>> {
        self.seek(row)?;
        Ok(self
            .fetch_assoc()?
            .and_then(|mut map| map.remove(&column.to_lowercase())))
    }

    /// Absolute reposition. `position == row_count()` places the cursor
    /// after the last row.
    pub fn seek(&mut self, position: usize) -> SqlResult<()> {
        let count = self.row_count()?;
        if position > count {
            return Err(SqlError::invalid(format!(
                "cannot seek to row {position} of {count}"
            )));
        }
        self.reposition(position)
    }

    /// Number of rows in the set; scans and restores when the backend
    /// cannot report it.
    pub fn row_count(&mut self) -> SqlResult<usize> {
        if self.freed {
            return Ok(0);
        }
        if let Some(count) = self.row_count.or_else(|| self.native.row_count()) {
            return Ok(count);
        }

        let restore = self.position;
        self.native.rewind()?;
        let mut count = 0;
        while self.native.next_row()?.is_some() {
            count += 1;
        }
        self.position = count;
        self.reposition(restore)?;
        self.row_count = Some(count);
        Ok(count)
    }

    /// Lazy key/value sequence over the remaining rows.
    ///
    /// One-column results yield [`KeyValue::Single`], two-column results
    /// yield [`KeyValue::Pair`]; any other shape is rejected.
    pub fn key_values(&mut self) -> SqlResult<KeyValues<'_>> {
        match self.column_count() {
            1 | 2 => Ok(KeyValues { result: self }),
            n => Err(SqlError::invalid(format!(
                "key/value iteration needs 1 or 2 columns, result has {n}"
            ))),
        }
    }

    /// Release native resources. Safe to call more than once.
    pub fn free(&mut self) {
        if !self.freed {
            self.native.free();
            self.freed = true;
            self.position = 0;
        }
    }

    pub fn is_freed(&self) -> bool {
        self.freed
    }

    fn next_native(&mut self) -> SqlResult<Option<Row>> {
        if self.freed {
            return Ok(None);
        }
        let row = self.native.next_row()?;
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    fn reposition(&mut self, position: usize) -> SqlResult<()> {
        if position == self.position {
            return Ok(());
        }
        match self.native.seek(position) {
            Ok(()) => {}
            Err(err) if err.is_not_implemented() => {
                self.native.rewind()?;
                for _ in 0..position {
                    if self.native.next_row()?.is_none() {
                        break;
                    }
                }
            }
            Err(err) => return Err(err),
        }
        self.position = position;
        Ok(())
    }
}

impl From<BufferedRows> for QueryResult {
    fn from(rows: BufferedRows) -> Self {
        QueryResult::new(rows)
    }
}

impl Iterator for QueryResult {
    type Item = SqlResult<Fetched>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch().transpose()
    }
}

/// Pull-based key/value iteration borrowed from a [`QueryResult`].
///
/// Ends when the cursor is exhausted; a fresh sequence continues from the
/// cursor's current position.
pub struct KeyValues<'a> {
    result: &'a mut QueryResult,
}

impl Iterator for KeyValues<'_> {
    type Item = SqlResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.result.fetch_indexed() {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(err) => return Some(Err(err)),
        };
        let mut values = row.into_iter();
        let item = match (values.next(), values.next()) {
            (Some(key), Some(value)) => KeyValue::Pair(key, value),
            (Some(value), None) => KeyValue::Single(value),
            _ => return None,
        };
        Some(Ok(item))
    }
}

fn trim_value(value: Value) -> Value {
    match value {
        Value::String(s) if s.ends_with(char::is_whitespace) => {
            Value::String(s.trim_end().to_string())
        }
        other => other,
    }
}
