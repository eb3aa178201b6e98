//! [`SqliteStore`] — the SQLite implementation of [`RegistrationStore`].

use std::path::Path;

use ihp_core::{
  Field, RegistrationRecord,
  store::{RegistrationStore, UpsertOutcome},
};
use rusqlite::{OptionalExtension as _, types::Value as SqlValue};

use crate::{
  Result,
  encode::{decode_record, encode_record},
  schema::{self, SELECT_BY_ID_SQL, TABLE, UPSERT_SQL},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A registrations store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`. The schema is not touched until
  /// [`RegistrationStore::ensure_schema`] is called.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// The `user_version` stamped by the last schema ensure.
  pub async fn schema_version(&self) -> Result<u32> {
    let version = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get::<_, u32>(0))?)
      })
      .await?;
    Ok(version)
  }
}

// ─── RegistrationStore impl ──────────────────────────────────────────────────

impl RegistrationStore for SqliteStore {
  type Error = crate::Error;

  async fn ensure_schema(&self, version: u32) -> Result<Vec<String>> {
    let added = self
      .conn
      .call(move |conn| Ok(schema::ensure(conn, version)?))
      .await?;

    if added.is_empty() {
      tracing::debug!(table = TABLE, version, "schema up to date");
    } else {
      tracing::info!(table = TABLE, version, columns = ?added, "added missing columns");
    }
    Ok(added.into_iter().map(str::to_owned).collect())
  }

  async fn upsert(&self, record: RegistrationRecord) -> Result<UpsertOutcome> {
    let params = encode_record(&record);
    let id = record.id;

    let existed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existed = tx
          .query_row(
            &format!("SELECT 1 FROM {TABLE} WHERE id = ?1"),
            rusqlite::params![id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        {
          let mut stmt = tx.prepare_cached(&UPSERT_SQL)?;
          stmt.execute(rusqlite::params_from_iter(params))?;
        }
        tx.commit()?;
        Ok(existed)
      })
      .await?;

    Ok(if existed { UpsertOutcome::Replaced } else { UpsertOutcome::Inserted })
  }

  async fn get(&self, id: String) -> Result<Option<RegistrationRecord>> {
    let raw: Option<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&SELECT_BY_ID_SQL)?;
        Ok(stmt
          .query_row(rusqlite::params![id], |row| {
            (0..Field::ALL.len())
              .map(|i| row.get::<_, SqlValue>(i))
              .collect::<rusqlite::Result<Vec<_>>>()
          })
          .optional()?)
      })
      .await?;

    raw.map(decode_record).transpose()
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| {
          row.get(0)
        })?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}
