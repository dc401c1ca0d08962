//! Postgres table source implementation.
//!
//! Reads a full table through a lazily connected `sqlx` pool. Connection
//! errors therefore surface at fetch time, where the pipeline maps them
//! to its source-unavailable taxonomy, not at wiring time.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::info;

use crate::errors::SourceError;
use crate::interfaces::TableSource;
use batch_indexer_shared::{Table, TableRow};

/// Postgres-backed `TableSource`.
#[derive(Debug)]
pub struct PostgresTableSource {
    pool: PgPool,
}

impl PostgresTableSource {
    /// Create a source for the given connection URL.
    ///
    /// The pool connects lazily: an unreachable server or bad credentials
    /// surface on the first `fetch_table`, not here. Only a malformed URL
    /// fails immediately.
    pub fn connect_lazy(url: &str) -> Result<Self, SourceError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_lazy(url)
            .map_err(|e| SourceError::connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create a source over an existing pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableSource for PostgresTableSource {
    async fn fetch_table(&self, table_name: &str) -> Result<Table, SourceError> {
        validate_table_name(table_name)?;

        // The table name cannot be a bind parameter; it is validated
        // above and quoted as an identifier here.
        let sql = format!(r#"SELECT * FROM "{}""#, table_name);

        // Column names come from the statement metadata, not the result
        // rows, so an empty table still yields its full header.
        let statement = self
            .pool
            .prepare(sql.as_str())
            .await
            .map_err(map_sqlx_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = statement
            .query()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut table = Table::new(columns);
        for (seq, row) in rows.iter().enumerate() {
            let cells = (0..row.columns().len())
                .map(|index| decode_cell(row, index))
                .collect::<Result<Vec<_>, _>>()?;
            table.rows.push(TableRow::new(seq as u64, cells));
        }

        info!(
            table = %table_name,
            rows = table.row_count(),
            columns = table.columns.len(),
            "Fetched source table"
        );
        Ok(table)
    }
}

/// Reject anything that is not a plain SQL identifier before it gets
/// anywhere near the query text.
fn validate_table_name(name: &str) -> Result<(), SourceError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(SourceError::InvalidTableName(name.to_string()))
    }
}

/// Decode one cell to its string form, `None` for SQL NULL.
///
/// Values are rendered with their natural `Display` form; no cleaning or
/// normalization happens here.
fn decode_cell(row: &PgRow, index: usize) -> Result<Option<String>, SourceError> {
    let column = row.columns()[index].name().to_string();

    let raw = row
        .try_get_raw(index)
        .map_err(|e| SourceError::query(e.to_string()))?;
    if raw.is_null() {
        return Ok(None);
    }
    let type_name = raw.type_info().name().to_string();

    let decoded: Result<String, sqlx::Error> = match type_name.as_str() {
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row.try_get::<String, _>(index),
        "INT2" => row.try_get::<i16, _>(index).map(|v| v.to_string()),
        "INT4" => row.try_get::<i32, _>(index).map(|v| v.to_string()),
        "INT8" => row.try_get::<i64, _>(index).map(|v| v.to_string()),
        "FLOAT4" => row.try_get::<f32, _>(index).map(|v| v.to_string()),
        "FLOAT8" => row.try_get::<f64, _>(index).map(|v| v.to_string()),
        "NUMERIC" => row
            .try_get::<sqlx::types::BigDecimal, _>(index)
            .map(|v| v.to_string()),
        "BOOL" => row.try_get::<bool, _>(index).map(|v| v.to_string()),
        "DATE" => row
            .try_get::<sqlx::types::chrono::NaiveDate, _>(index)
            .map(|v| v.to_string()),
        "TIME" => row
            .try_get::<sqlx::types::chrono::NaiveTime, _>(index)
            .map(|v| v.to_string()),
        "TIMESTAMP" => row
            .try_get::<sqlx::types::chrono::NaiveDateTime, _>(index)
            .map(|v| v.to_string()),
        "TIMESTAMPTZ" => row
            .try_get::<sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc>, _>(index)
            .map(|v| v.to_rfc3339()),
        "UUID" => row
            .try_get::<sqlx::types::Uuid, _>(index)
            .map(|v| v.to_string()),
        "JSON" | "JSONB" => row
            .try_get::<serde_json::Value, _>(index)
            .map(|v| v.to_string()),
        other => {
            return Err(SourceError::UnsupportedType {
                column,
                type_name: other.to_string(),
            });
        }
    };

    decoded
        .map(Some)
        .map_err(|e| SourceError::query(format!("column {}: {}", column, e)))
}

fn map_sqlx_error(err: sqlx::Error) -> SourceError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Configuration(_) => SourceError::connection(err.to_string()),
        _ => SourceError::query(err.to_string()),
    }
}
