use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::DatabaseError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `DatabaseError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, DatabaseError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Step an already-bound statement to completion, buffering every row.
///
/// SQLite recompiles a statement on its first step after a schema change, so
/// column metadata is read from the stepped statement. `known_columns` is
/// shared with the result when the names are unchanged.
///
/// # Errors
/// Returns `DatabaseError::Sqlite` if stepping or reading a row fails.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    known_columns: &Arc<Vec<String>>,
) -> Result<ResultSet, DatabaseError> {
    let mut buffered = Vec::with_capacity(10);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let col_count = row.as_ref().column_count();
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        buffered.push(row_values);
    }
    drop(rows);

    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let column_names = if column_names == **known_columns {
        Arc::clone(known_columns)
    } else {
        Arc::new(column_names)
    };

    let mut result_set = ResultSet::with_capacity(column_names, buffered.len());
    for row_values in buffered {
        result_set.push_row(row_values);
    }
    Ok(result_set)
}
