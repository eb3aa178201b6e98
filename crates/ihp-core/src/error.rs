//! Error types for `ihp-core`.

use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("row has {found} cells, layout expects {expected}")]
  ShortRow { expected: usize, found: usize },

  #[error("row has {found} cells, layout expects only {expected}")]
  WideRow { expected: usize, found: usize },

  #[error("invalid timestamp in column {column} ({header}): {value:?}")]
  InvalidTimestamp {
    column: usize,
    header: &'static str,
    value:  String,
  },

  #[error("invalid number in column {column} ({header}): {value:?}")]
  InvalidFloat {
    column: usize,
    header: &'static str,
    value:  String,
  },

  #[error("invalid flag in column {column} ({header}): {value:?}")]
  InvalidFlag {
    column: usize,
    header: &'static str,
    value:  String,
  },

  #[error("field {field} holds {expected:?} values, got {found:?}")]
  KindMismatch {
    field:    &'static str,
    expected: ValueKind,
    found:    ValueKind,
  },

  #[error("invalid column layout {layout} v{version}: {reason}")]
  InvalidLayout {
    layout:  &'static str,
    version: u32,
    reason:  String,
  },
}

impl Error {
  /// True for failures caused by the shape or content of a source row, as
  /// opposed to programming errors in a layout.
  pub fn is_row_error(&self) -> bool {
    !matches!(self, Self::KindMismatch { .. } | Self::InvalidLayout { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
