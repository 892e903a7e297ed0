use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;
use tokio_postgres::types::Type;

use crate::error::DatabaseError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Build a result set from rows returned for a prepared statement.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set(
    column_names: Arc<Vec<String>>,
    rows: &[Row],
) -> Result<ResultSet, DatabaseError> {
    let column_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(column_names, rows.len());

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.push_row(row_values);
    }

    Ok(result_set)
}

/// Extracts a `SqlValue` from a `tokio_postgres` Row at the given index.
///
/// Types without a dedicated mapping are read as text, which fails for
/// binary-only types such as `numeric`; cast those to text in SQL.
///
/// # Errors
/// Returns `DatabaseError::Postgres` if the column cannot be read.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<SqlValue, DatabaseError> {
    let ty = row.columns()[idx].type_();

    let value = match *ty {
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| SqlValue::Int(i64::from(v))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)?
            .map(|v| SqlValue::Int(i64::from(v))),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(SqlValue::Int),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| SqlValue::Float(f64::from(v))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(SqlValue::Float),
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(SqlValue::Bool),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(SqlValue::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| SqlValue::Timestamp(v.naive_utc())),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .map(|v| SqlValue::Timestamp(v.and_time(NaiveTime::MIN))),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(idx)?.map(SqlValue::Json),
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(SqlValue::Blob),
        _ => row.try_get::<_, Option<String>>(idx)?.map(SqlValue::Text),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}
