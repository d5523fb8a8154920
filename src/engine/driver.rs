//! Blocking wrapper around one sqlx `AnyConnection`.

use crate::error::{SqlError, SqlResult};
use crate::result::{BufferedRows, Row};
use crate::value::Value;

use futures::TryStreamExt;
use once_cell::sync::OnceCell;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Column, Connection, Either, Executor, Row as _, TypeInfo};
use tokio::runtime::{Builder, Runtime};

static DRIVERS: OnceCell<()> = OnceCell::new();

/// One lazily opened connection plus the runtime that drives it.
pub struct SqlxConnection {
    url: String,
    // Dropped before `runtime`.
    conn: Option<AnyConnection>,
    runtime: Option<Runtime>,
}

impl SqlxConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: None,
            runtime: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection if it is not open yet.
    pub fn connect(&mut self) -> SqlResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        DRIVERS.get_or_init(sqlx::any::install_default_drivers);

        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| SqlError::Connection(format!("failed to start runtime: {e}")))?,
        };
        let conn = runtime.block_on(AnyConnection::connect(&self.url));
        self.runtime = Some(runtime);

        let conn = conn.map_err(|e| SqlError::Connection(e.to_string()))?;
        tracing::debug!(backend = conn.backend_name(), "connected");
        self.conn = Some(conn);
        Ok(())
    }

    pub fn disconnect(&mut self) -> SqlResult<()> {
        let (Some(conn), Some(runtime)) = (self.conn.take(), self.runtime.as_ref()) else {
            return Ok(());
        };
        runtime
            .block_on(conn.close())
            .map_err(|e| SqlError::Connection(e.to_string()))?;
        tracing::debug!(url = %redact(&self.url), "disconnected");
        Ok(())
    }

    /// Run one statement and buffer everything it returns.
    ///
    /// Without parameters the statement goes over the simple (text)
    /// protocol, so statements that cannot be prepared still work.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> SqlResult<BufferedRows> {
        self.connect()?;
        let (Some(conn), Some(runtime)) = (self.conn.as_mut(), self.runtime.as_ref()) else {
            return Err(SqlError::Connection("connection is not open".to_string()));
        };

        runtime.block_on(async move {
            let mut stream = if params.is_empty() {
                conn.fetch_many(sql)
            } else {
                let query = params.iter().fold(sqlx::query::<Any>(sql), bind);
                conn.fetch_many(query)
            };

            let mut columns = Vec::new();
            let mut rows = Vec::new();
            let mut affected_rows = 0;
            let mut insert_id = None;

            while let Some(item) = stream.try_next().await? {
                match item {
                    Either::Left(done) => {
                        affected_rows += done.rows_affected();
                        insert_id = done.last_insert_id().or(insert_id);
                    }
                    Either::Right(row) => {
                        if columns.is_empty() {
                            columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                        }
                        rows.push(decode_row(&row)?);
                    }
                }
            }

            Ok::<_, SqlError>(
                BufferedRows::new(columns, rows)
                    .with_affected_rows(affected_rows)
                    .with_insert_id(insert_id),
            )
        })
    }
}

fn bind<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(*v),
        Value::Int(v) => query.bind(*v),
        Value::Float(v) => query.bind(*v),
        Value::String(v) => query.bind(v.as_str()),
    }
}

fn decode_row(row: &AnyRow) -> SqlResult<Row> {
    (0..row.columns().len())
        .map(|index| match row.columns()[index].type_info().name() {
            // Untyped expression column; let the value decide.
            "NULL" => decode_fallback(row, index),
            name => decode_typed(row, index, name).or_else(|_| decode_fallback(row, index)),
        })
        .collect()
}

/// Decode by the driver-reported type name.
fn decode_typed(row: &AnyRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.into(),
        "SMALLINT" => row.try_get::<Option<i16>, _>(index)?.map(i64::from).into(),
        "INTEGER" => row.try_get::<Option<i32>, _>(index)?.map(i64::from).into(),
        "BIGINT" => row.try_get::<Option<i64>, _>(index)?.into(),
        "REAL" => row.try_get::<Option<f32>, _>(index)?.map(f64::from).into(),
        "DOUBLE" => row.try_get::<Option<f64>, _>(index)?.into(),
        "BLOB" => blob(row.try_get::<Option<Vec<u8>>, _>(index)?),
        _ => row.try_get::<Option<String>, _>(index)?.into(),
    };
    Ok(value)
}

/// Some drivers report declared types that differ from the stored value
/// (sqlite affinity, expression columns); try the common shapes in turn.
fn decode_fallback(row: &AnyRow, index: usize) -> SqlResult<Value> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.into());
    }
    Ok(blob(row.try_get::<Option<Vec<u8>>, _>(index)?))
}

fn blob(bytes: Option<Vec<u8>>) -> Value {
    bytes
        .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
        .unwrap_or(Value::Null)
}

/// Strip credentials from a connection URL for logging.
pub fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}
