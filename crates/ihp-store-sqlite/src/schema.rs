//! SQL schema for the registrations table.
//!
//! The table is derived from the record's field catalogue: one column per
//! [`Field`], named after it, with `id` as the primary key. Schema
//! initialisation is additive only. Columns the record has gained since the
//! table was created are appended with `ALTER TABLE … ADD COLUMN`; nothing is
//! ever dropped or retyped.

use std::{collections::HashSet, sync::LazyLock};

use ihp_core::{Field, ValueKind};
use rusqlite::Connection;

pub const TABLE: &str = "registrations";

const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS registrations_disaster_idx ON registrations(disaster_number);
CREATE INDEX IF NOT EXISTS registrations_county_idx   ON registrations(county);
CREATE INDEX IF NOT EXISTS registrations_state_idx    ON registrations(damaged_state_abbreviation);
CREATE INDEX IF NOT EXISTS registrations_zip_idx      ON registrations(damaged_zip_code);
";

/// Column declaration (type and default) for a field kind.
///
/// Amounts are nullable: SQLite stores a NaN as NULL.
fn column_decl(kind: ValueKind) -> &'static str {
  match kind {
    ValueKind::Text => "TEXT NOT NULL DEFAULT ''",
    ValueKind::Timestamp => "TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'",
    ValueKind::Float => "REAL DEFAULT 0",
    ValueKind::Flag => "INTEGER NOT NULL DEFAULT 0",
  }
}

fn create_table_sql() -> String {
  let columns: Vec<String> = Field::ALL
    .iter()
    .map(|&f| match f {
      Field::Id => "id TEXT PRIMARY KEY NOT NULL".to_owned(),
      _ => format!("{} {}", f.name(), column_decl(f.kind())),
    })
    .collect();
  format!(
    "CREATE TABLE IF NOT EXISTS {TABLE} (\n    {}\n);",
    columns.join(",\n    ")
  )
}

/// Comma-separated column list in [`Field::ALL`] order.
pub static COLUMN_LIST: LazyLock<String> = LazyLock::new(|| {
  Field::ALL.iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
});

/// Insert-or-overwrite-every-column, keyed on `id`. Parameters are bound in
/// [`Field::ALL`] order.
pub static UPSERT_SQL: LazyLock<String> = LazyLock::new(|| {
  let placeholders: Vec<String> =
    (1..=Field::ALL.len()).map(|i| format!("?{i}")).collect();
  let assignments: Vec<String> = Field::ALL
    .iter()
    .filter(|&&f| f != Field::Id)
    .map(|f| format!("{0} = excluded.{0}", f.name()))
    .collect();
  format!(
    "INSERT INTO {TABLE} ({}) VALUES ({})
     ON CONFLICT(id) DO UPDATE SET {}",
    *COLUMN_LIST,
    placeholders.join(", "),
    assignments.join(", ")
  )
});

pub static SELECT_BY_ID_SQL: LazyLock<String> = LazyLock::new(|| {
  format!("SELECT {} FROM {TABLE} WHERE id = ?1", *COLUMN_LIST)
});

fn existing_columns(conn: &Connection) -> rusqlite::Result<HashSet<String>> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE})"))?;
  let names = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<HashSet<_>>>()?;
  Ok(names)
}

/// Create the table if needed, append any missing columns, create indexes
/// and stamp `user_version`. Returns the names of the columns it added.
pub fn ensure(conn: &Connection, version: u32) -> rusqlite::Result<Vec<&'static str>> {
  conn.execute_batch(PRAGMAS)?;
  conn.execute_batch(&create_table_sql())?;

  let existing = existing_columns(conn)?;
  let mut added = Vec::new();
  for &field in Field::ALL {
    if !existing.contains(field.name()) {
      conn.execute_batch(&format!(
        "ALTER TABLE {TABLE} ADD COLUMN {} {}",
        field.name(),
        column_decl(field.kind())
      ))?;
      added.push(field.name());
    }
  }

  conn.execute_batch(INDEXES)?;
  conn.pragma_update(None, "user_version", version)?;
  Ok(added)
}
