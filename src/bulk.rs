//! Buffered bulk inserts.

use crate::error::SqlResult;
use crate::sql::Sql;
use crate::value::Value;

/// Collects rows for one table and inserts them in batches.
///
/// Rows may name different fields; each batch is written with the union of
/// every field seen so far, missing values bound as NULL. Pending rows are
/// flushed when the buffer reaches its limit, on [`finish`](Self::finish),
/// and on drop.
pub struct BulkInsert<'a> {
    sql: &'a mut Sql,
    table: String,
    fields: Vec<String>,
    rows: Vec<Vec<(String, Value)>>,
    limit: usize,
    inserted: u64,
}

impl<'a> BulkInsert<'a> {
    pub fn new(sql: &'a mut Sql, table: impl Into<String>, limit: usize) -> Self {
        Self {
            sql,
            table: table.into(),
            fields: Vec::new(),
            rows: Vec::new(),
            limit: limit.max(1),
            inserted: 0,
        }
    }

    /// Queue one row, flushing first if the buffer is full.
    pub fn add<K, V>(&mut self, row: impl IntoIterator<Item = (K, V)>) -> SqlResult<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let row: Vec<(String, Value)> = row.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        for (field, _) in &row {
            if !self.fields.contains(field) {
                self.fields.push(field.clone());
            }
        }
        self.rows.push(row);

        if self.rows.len() >= self.limit {
            self.flush()?;
        }
        Ok(())
    }

    /// Write every pending row; returns the rows affected by this flush.
    ///
    /// On error the rows stay buffered for the next flush.
    pub fn flush(&mut self) -> SqlResult<u64> {
        if self.rows.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Vec<Value>> = self.rows.iter().map(|row| self.align(row)).collect();

        tracing::debug!(table = %self.table, rows = rows.len(), "flushing bulk insert");
        let affected = self
            .sql
            .bulk_insert(&self.table, &self.fields, &rows)?
            .affected_rows();
        self.rows.clear();
        self.inserted += affected;
        Ok(affected)
    }

    /// Flush and return the total number of rows written.
    pub fn finish(mut self) -> SqlResult<u64> {
        self.flush()?;
        Ok(self.inserted)
    }

    pub fn pending(&self) -> usize {
        self.rows.len()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn align(&self, row: &[(String, Value)]) -> Vec<Value> {
        self.fields
            .iter()
            .map(|field| {
                row.iter()
                    .find(|(f, _)| f == field)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Null)
            })
            .collect()
    }
}

impl Drop for BulkInsert<'_> {
    fn drop(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::error!(table = %self.table, "bulk insert flush on drop failed: {}", e);
        }
    }
}
