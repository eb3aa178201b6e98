//! Typed cell values produced by the coercers and consumed by the record.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A point in time with the offset it was written with in the source.
pub type Timestamp = DateTime<FixedOffset>;

/// The storage kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
  Text,
  Timestamp,
  Float,
  Flag,
}

/// One decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Text(String),
  Timestamp(Timestamp),
  Float(f64),
  Flag(bool),
}

impl Value {
  pub fn kind(&self) -> ValueKind {
    match self {
      Self::Text(_) => ValueKind::Text,
      Self::Timestamp(_) => ValueKind::Timestamp,
      Self::Float(_) => ValueKind::Float,
      Self::Flag(_) => ValueKind::Flag,
    }
  }
}

// ─── FieldType ───────────────────────────────────────────────────────────────

/// Rust types that may appear as a field of
/// [`RegistrationRecord`](crate::record::RegistrationRecord).
pub trait FieldType: Sized {
  const KIND: ValueKind;

  fn into_value(self) -> Value;

  /// Returns `None` when `value` is of a different kind.
  fn from_value(value: Value) -> Option<Self>;
}

impl FieldType for String {
  const KIND: ValueKind = ValueKind::Text;

  fn into_value(self) -> Value { Value::Text(self) }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl FieldType for Timestamp {
  const KIND: ValueKind = ValueKind::Timestamp;

  fn into_value(self) -> Value { Value::Timestamp(self) }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Timestamp(t) => Some(t),
      _ => None,
    }
  }
}

impl FieldType for f64 {
  const KIND: ValueKind = ValueKind::Float;

  fn into_value(self) -> Value { Value::Float(self) }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Float(f) => Some(f),
      _ => None,
    }
  }
}

impl FieldType for bool {
  const KIND: ValueKind = ValueKind::Flag;

  fn into_value(self) -> Value { Value::Flag(self) }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Flag(b) => Some(b),
      _ => None,
    }
  }
}
