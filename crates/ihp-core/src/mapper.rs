//! Row mapper: one source row → one [`RegistrationRecord`].

use crate::{
  Error, Result,
  coerce::{Coercer, CoercionMode},
  layout::{ColumnLayout, ColumnSpec},
  record::{Field, RegistrationRecord},
};

/// The outcome of mapping one row.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
  pub record:    RegistrationRecord,
  /// Best-effort fields whose cell could not be coerced and were left at
  /// their default.
  pub defaulted: Vec<Field>,
}

/// Applies a validated [`ColumnLayout`] to raw rows.
#[derive(Debug, Clone, Copy)]
pub struct RowMapper<'a> {
  layout: &'a ColumnLayout,
}

impl<'a> RowMapper<'a> {
  /// Validates `layout` once so that mapping can rely on it.
  pub fn new(layout: &'a ColumnLayout) -> Result<Self> {
    layout.validate()?;
    Ok(Self { layout })
  }

  pub fn layout(&self) -> &'a ColumnLayout { self.layout }

  /// Map one row. The row must have exactly as many cells as the layout has
  /// columns.
  pub fn map<S: AsRef<str>>(&self, row: &[S]) -> Result<MappedRow> {
    let expected = self.layout.width();
    if row.len() < expected {
      return Err(Error::ShortRow { expected, found: row.len() });
    }
    if row.len() > expected {
      return Err(Error::WideRow { expected, found: row.len() });
    }

    let mut record = RegistrationRecord::default();
    let mut defaulted = Vec::new();

    for column in self.layout.columns {
      let raw = row[column.index].as_ref();
      match column.coercer.coerce(raw) {
        Some(value) => record.set(column.field, value)?,
        None => match column.mode {
          CoercionMode::BestEffort => defaulted.push(column.field),
          CoercionMode::Required => return Err(coercion_error(column, raw)),
        },
      }
    }

    Ok(MappedRow { record, defaulted })
  }
}

fn coercion_error(column: &ColumnSpec, raw: &str) -> Error {
  let (column_index, header, value) = (column.index, column.header, raw.to_owned());
  match column.coercer {
    Coercer::Timestamp => Error::InvalidTimestamp { column: column_index, header, value },
    Coercer::Float => Error::InvalidFloat { column: column_index, header, value },
    // Text never fails; a required flag column is the only other case.
    Coercer::Flag | Coercer::Text => Error::InvalidFlag { column: column_index, header, value },
  }
}
