//! Encoding and decoding between [`RegistrationRecord`] and SQLite values.
//!
//! Timestamps are stored as RFC 3339 strings with their original offset,
//! flags as 0/1 integers, amounts as REAL.

use chrono::DateTime;
use ihp_core::{Field, RegistrationRecord, Value, ValueKind};
use rusqlite::types::Value as SqlValue;

use crate::{Error, Result};

pub fn encode_value(value: Value) -> SqlValue {
  match value {
    Value::Text(s) => SqlValue::Text(s),
    Value::Timestamp(t) => SqlValue::Text(t.to_rfc3339()),
    Value::Float(f) => SqlValue::Real(f),
    Value::Flag(b) => SqlValue::Integer(i64::from(b)),
  }
}

/// One SQL parameter per field, in [`Field::ALL`] order.
pub fn encode_record(record: &RegistrationRecord) -> Vec<SqlValue> {
  Field::ALL
    .iter()
    .map(|&f| encode_value(record.get(f)))
    .collect()
}

fn sql_type_name(value: &SqlValue) -> &'static str {
  match value {
    SqlValue::Null => "NULL",
    SqlValue::Integer(_) => "INTEGER",
    SqlValue::Real(_) => "REAL",
    SqlValue::Text(_) => "TEXT",
    SqlValue::Blob(_) => "BLOB",
  }
}

pub fn decode_value(field: Field, raw: SqlValue) -> Result<Value> {
  let column = field.name();
  match (field.kind(), raw) {
    (ValueKind::Text, SqlValue::Text(s)) => Ok(Value::Text(s)),
    (ValueKind::Timestamp, SqlValue::Text(s)) => DateTime::parse_from_rfc3339(&s)
      .map(Value::Timestamp)
      .map_err(|e| Error::DateParse { column, message: e.to_string() }),
    (ValueKind::Float, SqlValue::Real(f)) => Ok(Value::Float(f)),
    (ValueKind::Float, SqlValue::Integer(i)) => Ok(Value::Float(i as f64)),
    // SQLite turns NaN into NULL on the way in.
    (ValueKind::Float, SqlValue::Null) => Ok(Value::Float(f64::NAN)),
    (ValueKind::Flag, SqlValue::Integer(i)) => Ok(Value::Flag(i != 0)),
    (kind, other) => Err(Error::ColumnType {
      column,
      expected: match kind {
        ValueKind::Text | ValueKind::Timestamp => "TEXT",
        ValueKind::Float => "REAL",
        ValueKind::Flag => "INTEGER",
      },
      found: sql_type_name(&other),
    }),
  }
}

/// Rebuild a record from a row read in [`Field::ALL`] order.
pub fn decode_record(raw: Vec<SqlValue>) -> Result<RegistrationRecord> {
  let mut record = RegistrationRecord::default();
  for (&field, value) in Field::ALL.iter().zip(raw) {
    record.set(field, decode_value(field, value)?)?;
  }
  Ok(record)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_encode_as_integers() {
    assert_eq!(encode_value(Value::Flag(true)), SqlValue::Integer(1));
    assert_eq!(encode_value(Value::Flag(false)), SqlValue::Integer(0));
  }

  #[test]
  fn timestamp_keeps_offset_through_text() {
    let t = DateTime::parse_from_rfc3339("2019-05-04T10:00:00.5-06:00").unwrap();
    let SqlValue::Text(s) = encode_value(Value::Timestamp(t)) else {
      panic!("expected text")
    };
    let back = decode_value(Field::LastRefresh, SqlValue::Text(s)).unwrap();
    assert_eq!(back, Value::Timestamp(t));
    let Value::Timestamp(back) = back else { unreachable!() };
    assert_eq!(back.offset().local_minus_utc(), -6 * 3600);
  }

  #[test]
  fn integer_amount_reads_as_float() {
    let v = decode_value(Field::RepairAmount, SqlValue::Integer(42)).unwrap();
    assert_eq!(v, Value::Float(42.0));
  }

  #[test]
  fn wrong_sql_type_is_reported() {
    let err = decode_value(Field::SbaApproved, SqlValue::Text("yes".into()))
      .unwrap_err();
    assert!(matches!(
      err,
      Error::ColumnType { column: "sba_approved", expected: "INTEGER", found: "TEXT" }
    ));
  }

  #[test]
  fn bad_stored_timestamp_is_reported() {
    let err = decode_value(Field::DeclarationDate, SqlValue::Text("soon".into()))
      .unwrap_err();
    assert!(matches!(err, Error::DateParse { column: "declaration_date", .. }));
  }
}
