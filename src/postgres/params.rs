use std::error::Error;

use chrono::{NaiveDate, NaiveTime};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::types::SqlValue;

type BoxError = Box<dyn Error + Sync + Send>;

/// Largest integer magnitude `f32` holds exactly.
const F32_EXACT: u64 = 1 << 24;
/// Largest integer magnitude `f64` holds exactly.
const F64_EXACT: u64 = 1 << 53;

/// Borrow values as the parameter slice tokio-postgres expects.
#[must_use]
pub fn as_refs(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn is_text(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

fn mismatch(value: &SqlValue, ty: &Type) -> BoxError {
    format!("cannot bind {value:?} to a {ty} parameter without losing data").into()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Write `i` for an integer or float parameter, failing when it does not fit.
fn int_to_sql(i: i64, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
        Type::INT8 => i.to_sql(ty, out),
        #[allow(clippy::cast_precision_loss)]
        Type::FLOAT4 if i.unsigned_abs() <= F32_EXACT => (i as f32).to_sql(ty, out),
        #[allow(clippy::cast_precision_loss)]
        Type::FLOAT8 if i.unsigned_abs() <= F64_EXACT => (i as f64).to_sql(ty, out),
        _ => Err(mismatch(&SqlValue::Int(i), ty)),
    }
}

/// Write `f` for an integer or float parameter. Integer parameters take only
/// integral values in range.
fn float_to_sql(f: f64, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        #[allow(clippy::cast_possible_truncation)]
        Type::FLOAT4 if !f.is_finite() || f.abs() <= f64::from(f32::MAX) => {
            (f as f32).to_sql(ty, out)
        }
        Type::FLOAT8 => f.to_sql(ty, out),
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        Type::INT2 | Type::INT4 | Type::INT8
            if f.fract() == 0.0 && f.abs() <= F64_EXACT as f64 =>
        {
            int_to_sql(f as i64, ty, out)
        }
        _ => Err(mismatch(&SqlValue::Float(f), ty)),
    }
}

/// Values are encoded for the type the server declared for each parameter.
/// Conversions that keep the value intact are applied (numeric text to a
/// number, an integral float to an integer column, anything to text); any
/// other pairing is an error rather than a silently reinterpreted encoding.
impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Int(i) => match *ty {
                _ if is_text(ty) => i.to_string().to_sql(ty, out),
                Type::BOOL if *i == 0 || *i == 1 => (*i == 1).to_sql(ty, out),
                _ => int_to_sql(*i, ty, out),
            },
            SqlValue::Float(f) => match *ty {
                _ if is_text(ty) => f.to_string().to_sql(ty, out),
                _ => float_to_sql(*f, ty, out),
            },
            SqlValue::Text(s) => match *ty {
                _ if is_text(ty) => s.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(s.trim().parse()?, ty, out),
                Type::FLOAT4 | Type::FLOAT8 => float_to_sql(s.trim().parse()?, ty, out),
                Type::BOOL => parse_bool(s)
                    .ok_or_else(|| mismatch(self, ty))?
                    .to_sql(ty, out),
                Type::JSON | Type::JSONB => {
                    serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out)
                }
                Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => {
                    if *ty == Type::DATE
                        && let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%F")
                    {
                        return date.to_sql(ty, out);
                    }
                    self.as_timestamp()
                        .map(SqlValue::Timestamp)
                        .ok_or_else(|| mismatch(self, ty))?
                        .to_sql(ty, out)
                }
                Type::BYTEA => s.as_bytes().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(i64::from(*b), ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Timestamp(dt) => match *ty {
                Type::TIMESTAMP => dt.to_sql(ty, out),
                Type::TIMESTAMPTZ => dt.and_utc().to_sql(ty, out),
                Type::DATE if dt.time() == NaiveTime::MIN => dt.date().to_sql(ty, out),
                _ if is_text(ty) => dt.format("%F %T%.f").to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Json(jsval) => match *ty {
                Type::JSON | Type::JSONB => jsval.to_sql(ty, out),
                _ if is_text(ty) => jsval.to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Blob(blob) => match *ty {
                Type::BYTEA => blob.to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &SqlValue, ty: &Type) -> Result<Vec<u8>, BoxError> {
        let mut out = bytes::BytesMut::new();
        value.to_sql(ty, &mut out)?;
        Ok(out.to_vec())
    }

    #[test]
    fn numeric_text_is_encoded_as_the_declared_number() {
        let text = SqlValue::from("1234");
        assert_eq!(encode(&text, &Type::INT4).unwrap(), 1234i32.to_be_bytes());
        assert_eq!(encode(&text, &Type::INT8).unwrap(), 1234i64.to_be_bytes());
        assert_eq!(encode(&SqlValue::from(" 2.5 "), &Type::FLOAT8).unwrap(), 2.5f64.to_be_bytes());
        assert!(encode(&SqlValue::from("12x"), &Type::INT4).is_err());
    }

    #[test]
    fn integral_floats_bind_to_integer_parameters() {
        assert_eq!(encode(&SqlValue::Float(3.0), &Type::INT8).unwrap(), 3i64.to_be_bytes());
        assert_eq!(encode(&SqlValue::Float(-7.0), &Type::INT2).unwrap(), (-7i16).to_be_bytes());
        assert!(encode(&SqlValue::Float(1.5), &Type::INT8).is_err());
        assert!(encode(&SqlValue::Float(70000.0), &Type::INT2).is_err());
    }

    #[test]
    fn integers_widen_and_narrow_by_declared_type() {
        assert_eq!(encode(&SqlValue::Int(5), &Type::INT2).unwrap(), 5i16.to_be_bytes());
        assert_eq!(encode(&SqlValue::Int(5), &Type::FLOAT8).unwrap(), 5f64.to_be_bytes());
        assert!(encode(&SqlValue::Int(i64::MAX), &Type::INT4).is_err());
        assert!(encode(&SqlValue::Int(i64::MAX), &Type::FLOAT8).is_err());
        assert_eq!(encode(&SqlValue::Int(42), &Type::TEXT).unwrap(), b"42");
    }

    #[test]
    fn booleans_and_text_convert_both_ways() {
        assert_eq!(encode(&SqlValue::Bool(true), &Type::INT4).unwrap(), 1i32.to_be_bytes());
        assert_eq!(encode(&SqlValue::from("yes"), &Type::BOOL).unwrap(), [1]);
        assert_eq!(encode(&SqlValue::Int(0), &Type::BOOL).unwrap(), [0]);
        assert!(encode(&SqlValue::Bool(true), &Type::FLOAT8).is_err());
        assert!(encode(&SqlValue::from("maybe"), &Type::BOOL).is_err());
    }

    #[test]
    fn mismatched_pairings_fail() {
        assert!(encode(&SqlValue::Blob(vec![1, 2]), &Type::TEXT).is_err());
        assert!(encode(&SqlValue::Json(serde_json::json!({"a": 1})), &Type::INT4).is_err());
        let noon = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(encode(&SqlValue::Timestamp(noon), &Type::DATE).is_err());
        assert!(encode(&SqlValue::Timestamp(noon), &Type::TIMESTAMP).is_ok());
        assert!(encode(&SqlValue::from("2024-05-06"), &Type::DATE).is_ok());
        assert!(encode(&SqlValue::from("2024-05-06 12:00:00"), &Type::DATE).is_err());
    }

    #[test]
    fn null_binds_to_anything() {
        let mut out = bytes::BytesMut::new();
        assert!(matches!(SqlValue::Null.to_sql(&Type::INT4, &mut out), Ok(IsNull::Yes)));
        assert!(out.is_empty());
    }
}
