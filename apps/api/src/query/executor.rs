//! Query Executor: runs generated SQL against the events database.
//!
//! SQLite is dynamically typed, so values are decoded by the storage class of
//! each cell rather than the declared column type.

use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, SqlitePool, Statement, TypeInfo, ValueRef};
use thiserror::Error;
use tracing::debug;

use crate::query::tabular::TabularResult;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("query execution failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("query execution failed: {0}")]
    Store(String),
}

/// The relational store capability.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<TabularResult, ExecutionError>;
}

pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Result column names from the prepared statement, for queries that
    /// returned no rows to read them from.
    async fn column_names(&self, sql: &str) -> Result<Vec<String>, ExecutionError> {
        let statement = (&self.pool).prepare(sql).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str) -> Result<TabularResult, ExecutionError> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let result = if rows.is_empty() {
            TabularResult::new(self.column_names(sql).await?, Vec::new())
        } else {
            rows_to_tabular(&rows)?
        };
        debug!("Query returned {} rows", result.len());
        Ok(result)
    }
}

fn rows_to_tabular(rows: &[SqliteRow]) -> Result<TabularResult, ExecutionError> {
    let Some(first) = rows.first() else {
        return Ok(TabularResult::default());
    };

    let columns = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let values = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|idx| extract_value(row, idx))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularResult::new(columns, values))
}

fn extract_value(row: &SqliteRow, idx: usize) -> Result<Value, ExecutionError> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" | "NUMERIC" => {
            let f = row.try_get::<f64, _>(idx)?;
            Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(idx)?;
            Value::String(format!("<{} bytes>", bytes.len()))
        }
        "TEXT" | "DATETIME" | "DATE" | "TIME" => Value::String(row.try_get::<String, _>(idx)?),
        other => {
            return Err(ExecutionError::Store(format!(
                "unsupported value type '{other}' in column {idx}"
            )))
        }
    };

    Ok(value)
}
