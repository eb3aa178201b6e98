//! Error type for `ihp-ingest`.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Phase;

/// Everything that can stop a load. All variants are fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot open source {path}: {source}")]
  Open {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("i/o error reading source: {0}")]
  Io(#[from] std::io::Error),

  #[error("malformed source: {0}")]
  Csv(#[from] csv::Error),

  /// The reader failed on a data row; `row` is 1-based, header excluded.
  #[error("row {row}: malformed source: {source}")]
  Read {
    row:    u64,
    #[source]
    source: csv::Error,
  },

  #[error("source has no header row")]
  MissingHeader,

  #[error(
    "header does not match layout {layout}: {count} column(s) differ, first at \
     column {first_index} (expected {expected:?}, found {found:?})"
  )]
  HeaderDrift {
    layout:      &'static str,
    count:       usize,
    first_index: usize,
    expected:    &'static str,
    found:       Option<String>,
  },

  #[error("layout error: {0}")]
  Layout(#[source] ihp_core::Error),

  /// A row could not be mapped; `row` is 1-based, header excluded.
  #[error("row {row}: {source}")]
  Row {
    row:    u64,
    #[source]
    source: ihp_core::Error,
  },

  #[error("schema error: {0}")]
  Schema(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("row {row} ({id}): store error: {source}")]
  Store {
    row:    u64,
    id:     String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("loader already ran and ended {phase:?}")]
  AlreadyRun { phase: Phase },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
