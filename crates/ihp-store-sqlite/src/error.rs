//! Error type for `ihp-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ihp_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error in {column}: {message}")]
  DateParse { column: &'static str, message: String },

  /// A stored value does not have the SQL type its field requires.
  #[error("column {column} holds {found} where {expected} was expected")]
  ColumnType {
    column:   &'static str,
    expected: &'static str,
    found:    &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
