//! Field coercers: raw text cell → typed [`Value`].
//!
//! Coercers never decide what a failure means. They report "could not
//! determine" as `None`, and the [`CoercionMode`] declared on the column
//! tells the row mapper whether that aborts the run or leaves the field at
//! its default.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::value::{Timestamp, Value, ValueKind};

/// How a column's raw text is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coercer {
  /// Copied verbatim; never fails.
  Text,
  /// `YYYY-MM-DDTHH:MM:SS[.fff]` followed by `Z` or `±HH:MM`.
  Timestamp,
  /// Decimal number.
  Float,
  /// One of the canonical true/false tokens, see [`parse_flag`].
  Flag,
}

impl Coercer {
  /// The kind of value this coercer produces.
  pub fn output(self) -> ValueKind {
    match self {
      Self::Text => ValueKind::Text,
      Self::Timestamp => ValueKind::Timestamp,
      Self::Float => ValueKind::Float,
      Self::Flag => ValueKind::Flag,
    }
  }

  pub fn coerce(self, raw: &str) -> Option<Value> {
    match self {
      Self::Text => Some(Value::Text(raw.to_owned())),
      Self::Timestamp => parse_timestamp(raw).map(Value::Timestamp),
      Self::Float => parse_float(raw).map(Value::Float),
      Self::Flag => parse_flag(raw).map(Value::Flag),
    }
  }
}

/// What a coercion failure means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
  /// Failure aborts the whole run.
  Required,
  /// Failure leaves the field at its type default and the run continues.
  BestEffort,
}

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Only the fixed `T`-separated shape with an upper-case `Z` or a numeric
/// offset. Leap seconds are rejected.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
  if raw.as_bytes().get(10) != Some(&b'T') {
    return None;
  }
  let t = match raw.strip_suffix('Z') {
    Some(local) => NaiveDateTime::parse_from_str(local, LOCAL_FORMAT)
      .ok()?
      .and_utc()
      .fixed_offset(),
    None => DateTime::parse_from_str(raw, OFFSET_FORMAT).ok()?,
  };
  // chrono folds `:60` into second 59 with an overflowing fraction.
  (t.nanosecond() < 1_000_000_000).then_some(t)
}

/// A decimal number. Values too large for `f64` are rejected rather than
/// rounded to infinity; an explicit `inf`/`infinity` still parses.
pub fn parse_float(raw: &str) -> Option<f64> {
  let v = raw.parse::<f64>().ok()?;
  if v.is_infinite() && !spells_infinity(raw) {
    return None;
  }
  Some(v)
}

fn spells_infinity(raw: &str) -> bool {
  let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
  unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
/// Everything else, including the empty string, is undetermined.
pub fn parse_flag(raw: &str) -> Option<bool> {
  match raw {
    "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
    "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
    _ => None,
  }
}
