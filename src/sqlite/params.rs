use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::DatabaseError;
use crate::params::{Params, bare_name};
use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
///
/// `SQLite` has no boolean, timestamp or JSON storage class: booleans become
/// 0/1, timestamps `YYYY-MM-DD HH:MM:SS[.f]` text and JSON its serialized text.
#[must_use]
pub fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind `params` to every placeholder of `stmt`.
///
/// Positional values must match the placeholder count exactly. Named values
/// are matched to `:name`, `@name` or `$name` placeholders regardless of the
/// sigil used in the key; every placeholder needs a value and every key a
/// placeholder.
///
/// # Errors
/// Returns the rusqlite parameter errors (`InvalidParameterCount`,
/// `InvalidParameterName`) or `DatabaseError::Parameter` when values are given
/// by name for a statement with anonymous placeholders.
pub fn bind_params(stmt: &mut Statement<'_>, params: &Params) -> Result<(), DatabaseError> {
    let expected = stmt.parameter_count();
    match params {
        Params::None => {
            if expected != 0 {
                return Err(rusqlite::Error::InvalidParameterCount(0, expected).into());
            }
        }
        Params::Positional(values) => {
            if values.len() != expected {
                return Err(rusqlite::Error::InvalidParameterCount(values.len(), expected).into());
            }
            for (idx, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, to_sqlite_value(value))?;
            }
        }
        Params::Named(pairs) => {
            let mut placeholders = Vec::with_capacity(expected);
            for idx in 1..=expected {
                let Some(name) = stmt.parameter_name(idx) else {
                    return Err(DatabaseError::Parameter(format!(
                        "placeholder {idx} is anonymous; bind values by position"
                    )));
                };
                placeholders.push(name.to_string());
            }

            if let Some((extra, _)) = pairs
                .iter()
                .find(|(key, _)| !placeholders.iter().any(|p| bare_name(p) == key))
            {
                return Err(rusqlite::Error::InvalidParameterName(format!(":{extra}")).into());
            }

            for (idx, name) in placeholders.iter().enumerate() {
                let value = params
                    .get_named(name)
                    .ok_or_else(|| rusqlite::Error::InvalidParameterName(name.clone()))?;
                stmt.raw_bind_parameter(idx + 1, to_sqlite_value(value))?;
            }
        }
    }
    Ok(())
}
