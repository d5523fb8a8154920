//! Query failure log.
//!
//! Every failed native execution is reported as a `tracing` error event.
//! With a log directory configured, a block is also appended to
//! `<dir>/query-errors-YYYY-MM-DD.log`. Failing to write that file never
//! replaces the original error.

use crate::error::SqlError;
use crate::value::Value;
use chrono::Local;
use std::backtrace::Backtrace;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One failed statement.
#[derive(Debug)]
pub struct QueryFailure<'a> {
    pub query: &'a str,
    pub params: &'a [Value],
    pub prepared: &'a str,
    pub error: &'a SqlError,
}

#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    dir: Option<PathBuf>,
}

impl QueryLog {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Path of today's log file, if a directory is configured.
    pub fn file_path(&self) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let name = format!("query-errors-{}.log", Local::now().format("%Y-%m-%d"));
        Some(dir.join(name))
    }

    pub fn record(&self, failure: &QueryFailure<'_>) {
        tracing::error!(
            query = failure.query,
            prepared = failure.prepared,
            params = ?failure.params,
            error = %failure.error,
            "query failed"
        );

        if let Err(e) = self.append(failure) {
            tracing::debug!("could not write query log: {}", e);
        }
    }

    fn append(&self, failure: &QueryFailure<'_>) -> std::io::Result<()> {
        let Some(path) = self.file_path() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let params = serde_json::to_string(failure.params).unwrap_or_default();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(
            file,
            "[{}] {}\nquery: {}\nparams: {}\nprepared: {}\n{}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            failure.error,
            failure.query,
            params,
            failure.prepared,
            Backtrace::force_capture()
        )
    }
}
