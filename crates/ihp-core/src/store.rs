//! The `RegistrationStore` trait.
//!
//! Implemented by storage backends (e.g. `ihp-store-sqlite`). The pipeline
//! driver depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::RegistrationRecord;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  /// No record with this id existed.
  Inserted,
  /// A record with this id existed and every one of its fields was replaced.
  Replaced,
}

/// A persistent collection of registration records keyed by id.
pub trait RegistrationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the destination schema if it does not exist and add any columns
  /// the record has gained since it was created. Idempotent.
  ///
  /// `version` is the column layout version being loaded. Returns the names
  /// of columns added to an existing schema.
  fn ensure_schema(
    &self,
    version: u32,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Insert `record`, or overwrite every field of the record already stored
  /// under the same id.
  ///
  /// Atomic per record: readers see either the previous record or the new
  /// one in full. On error the previous record is left untouched.
  fn upsert(
    &self,
    record: RegistrationRecord,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<RegistrationRecord>, Self::Error>> + Send + '_;

  /// Number of stored records.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
