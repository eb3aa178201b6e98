//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use chrono::DateTime;
use ihp_core::{
  RegistrationRecord, Timestamp,
  store::{RegistrationStore, UpsertOutcome},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.ensure_schema(1).await.expect("schema");
  s
}

fn ts(s: &str) -> Timestamp { DateTime::parse_from_rfc3339(s).unwrap() }

fn harvey(id: &str) -> RegistrationRecord {
  RegistrationRecord {
    id: id.into(),
    incident_type: "Hurricane".into(),
    declaration_date: ts("2017-08-25T00:00:00.000Z"),
    disaster_number: "4332".into(),
    county: "Harris (County)".into(),
    damaged_state_abbreviation: "TX".into(),
    damaged_city: "HOUSTON".into(),
    damaged_zip_code: "77002".into(),
    household_composition: "3".into(),
    gross_income: "30001-60000".into(),
    ihp_eligible: true,
    ihp_amount: 3500.0,
    ha_eligible: true,
    ha_amount: 2000.0,
    ona_amount: 1500.0,
    flood_damage: true,
    water_level: 24.0,
    sba_approved: true,
    last_refresh: ts("2023-05-10T10:15:00.123-05:00"),
    ..Default::default()
  }
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_new_then_get() {
  let s = store().await;
  let record = harvey("reg-1");

  let outcome = s.upsert(record.clone()).await.unwrap();
  assert_eq!(outcome, UpsertOutcome::Inserted);

  let fetched = s.get("reg-1".into()).await.unwrap();
  assert_eq!(fetched, Some(record));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_existing_replaces_every_field() {
  let s = store().await;
  s.upsert(harvey("reg-1")).await.unwrap();

  // Same id, everything else reset to defaults or changed.
  let replacement = RegistrationRecord {
    id: "reg-1".into(),
    incident_type: "Flood".into(),
    declaration_date: ts("2019-03-01T00:00:00Z"),
    last_refresh: ts("2024-01-01T00:00:00Z"),
    ..Default::default()
  };

  let outcome = s.upsert(replacement.clone()).await.unwrap();
  assert_eq!(outcome, UpsertOutcome::Replaced);

  let fetched = s.get("reg-1".into()).await.unwrap().unwrap();
  assert_eq!(fetched, replacement);
  assert!(!fetched.sba_approved);
  assert_eq!(fetched.ihp_amount, 0.0);
  assert_eq!(fetched.county, "");
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_is_idempotent() {
  let s = store().await;
  let record = harvey("reg-1");

  s.upsert(record.clone()).await.unwrap();
  let first = s.get("reg-1".into()).await.unwrap();
  s.upsert(record.clone()).await.unwrap();
  let second = s.get("reg-1".into()).await.unwrap();

  assert_eq!(first, second);
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn count_tracks_distinct_ids() {
  let s = store().await;
  assert_eq!(s.count().await.unwrap(), 0);

  for id in ["a", "b", "c", "b"] {
    s.upsert(harvey(id)).await.unwrap();
  }
  assert_eq!(s.count().await.unwrap(), 3);
}

#[tokio::test]
async fn nan_amount_survives_as_nan() {
  let s = store().await;
  let record = RegistrationRecord { water_level: f64::NAN, ..harvey("wet") };

  s.upsert(record).await.unwrap();
  let fetched = s.get("wet".into()).await.unwrap().unwrap();
  assert!(fetched.water_level.is_nan());
  assert_eq!(fetched.ihp_amount, 3500.0);
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopen_file_store_keeps_records() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ihp.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    assert!(s.ensure_schema(1).await.unwrap().is_empty());
    s.upsert(harvey("kept")).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.schema_version().await.unwrap(), 1);
  assert!(s.ensure_schema(1).await.unwrap().is_empty());
  assert_eq!(s.get("kept".into()).await.unwrap(), Some(harvey("kept")));
}

#[tokio::test]
async fn failed_upsert_keeps_previous_record() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ihp.db");

  let s = SqliteStore::open(&path).await.unwrap();
  s.ensure_schema(1).await.unwrap();
  s.upsert(harvey("frozen")).await.unwrap();

  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TRIGGER no_update BEFORE UPDATE ON registrations \
         BEGIN SELECT RAISE(ABORT, 'registrations are frozen'); END;",
      )
      .unwrap();
  }

  let mut changed = harvey("frozen");
  changed.damaged_city = "Elsewhere".into();
  changed.repair_amount = 1.0;
  assert!(s.upsert(changed).await.is_err());

  assert_eq!(s.get("frozen".into()).await.unwrap(), Some(harvey("frozen")));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn missing_columns_are_added() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("old.db");

  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE registrations (
           id            TEXT PRIMARY KEY NOT NULL,
           incident_type TEXT NOT NULL DEFAULT '',
           county        TEXT NOT NULL DEFAULT ''
         );
         INSERT INTO registrations (id, incident_type, county)
         VALUES ('old-1', 'Flood', 'Polk (County)');",
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let added = s.ensure_schema(2).await.unwrap();
  assert_eq!(added.len(), 68);
  assert!(added.contains(&"ihp_amount".to_owned()));
  assert!(!added.contains(&"county".to_owned()));
  assert_eq!(s.schema_version().await.unwrap(), 2);

  let old = s.get("old-1".into()).await.unwrap().unwrap();
  assert_eq!(old.incident_type, "Flood");
  assert_eq!(old.county, "Polk (County)");
  assert_eq!(old.ihp_amount, 0.0);
  assert!(!old.flood_damage);
  assert_eq!(old.declaration_date, ts("1970-01-01T00:00:00Z"));

  drop(s);
  let conn = rusqlite::Connection::open(&path).unwrap();
  let columns: i64 = conn
    .query_row(
      "SELECT COUNT(*) FROM pragma_table_info('registrations')",
      [],
      |row| row.get(0),
    )
    .unwrap();
  assert_eq!(columns, 71);
}
