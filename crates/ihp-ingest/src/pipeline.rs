//! The pipeline driver.
//!
//! ```text
//! Idle ─▶ CountingTotal ─▶ Streaming ─┬─▶ Completed
//!                                     └─▶ Aborted
//! ```
//!
//! Strictly sequential: each row is mapped, upserted and reported before the
//! next one is read. The first fatal error stops the run; rows already
//! upserted stay in the store, and re-running the whole source is safe
//! because upserts are idempotent per id.

use std::{borrow::Cow, path::Path};

use ihp_core::{
  ColumnLayout, RowMapper,
  store::{RegistrationStore, UpsertOutcome},
};
use tracing::{debug, error, info, warn};

use crate::{Error, Result, progress::Progress, source::Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Idle,
  CountingTotal,
  Streaming,
  Completed,
  Aborted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
  /// Draw a progress bar.
  pub progress:      bool,
  /// Treat header drift as fatal.
  pub strict_header: bool,
}

/// Counters for one run. Available from [`Loader::report`] after an abort
/// as well as on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
  /// Data rows estimated by the pre-scan.
  pub total_estimate:  u64,
  /// Rows mapped and upserted.
  pub processed:       u64,
  pub inserted:        u64,
  pub replaced:        u64,
  /// Best-effort fields that fell back to their default.
  pub flags_defaulted: u64,
}

/// Drives one load of a source file into a store.
pub struct Loader<'a, S> {
  store:   &'a S,
  mapper:  RowMapper<'a>,
  options: LoadOptions,
  phase:   Phase,
  report:  LoadReport,
}

impl<'a, S: RegistrationStore> Loader<'a, S> {
  /// Fails if `layout` does not validate.
  pub fn new(store: &'a S, layout: &'a ColumnLayout, options: LoadOptions) -> Result<Self> {
    let mapper = RowMapper::new(layout).map_err(Error::Layout)?;
    Ok(Self {
      store,
      mapper,
      options,
      phase: Phase::Idle,
      report: LoadReport::default(),
    })
  }

  pub fn phase(&self) -> Phase { self.phase }

  pub fn report(&self) -> &LoadReport { &self.report }

  /// Run the load to completion. A loader runs once: calling this again
  /// after [`Phase::Completed`] returns the same report, and after any other
  /// phase fails with [`Error::AlreadyRun`].
  pub async fn run(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
    match self.phase {
      Phase::Idle => {}
      Phase::Completed => return Ok(self.report.clone()),
      phase => return Err(Error::AlreadyRun { phase }),
    }

    match self.load(path.as_ref()).await {
      Ok(()) => {
        self.enter(Phase::Completed);
        info!(
          processed = self.report.processed,
          inserted = self.report.inserted,
          replaced = self.report.replaced,
          flags_defaulted = self.report.flags_defaulted,
          "load complete"
        );
        Ok(self.report.clone())
      }
      Err(e) => {
        self.enter(Phase::Aborted);
        error!(processed = self.report.processed, error = %e, "load aborted");
        Err(e)
      }
    }
  }

  fn enter(&mut self, phase: Phase) {
    debug!(from = ?self.phase, to = ?phase, "phase transition");
    self.phase = phase;
  }

  async fn load(&mut self, path: &Path) -> Result<()> {
    let layout = self.mapper.layout();

    self
      .store
      .ensure_schema(layout.version)
      .await
      .map_err(|e| Error::Schema(Box::new(e)))?;
    info!(layout = layout.name, version = layout.version, "schema ready");

    let mut source = Source::open(path)?;
    info!(path = %source.path().display(), "source opened");

    self.enter(Phase::CountingTotal);
    info!("counting rows");
    self.report.total_estimate = source.count_data_rows()?;
    info!(total = self.report.total_estimate, "rows to process");

    let (header, mut reader) = source.rows()?;
    self.check_header(&header)?;

    self.enter(Phase::Streaming);
    info!("parsing rows");
    let mut progress = Progress::new(self.report.total_estimate, self.options.progress);
    let mut record = csv::ByteRecord::new();
    let mut row = 0u64;

    loop {
      let more = match reader.read_byte_record(&mut record) {
        Ok(more) => more,
        Err(source) => {
          progress.abandon();
          return Err(Error::Read { row: row + 1, source });
        }
      };
      if !more {
        break;
      }
      row += 1;

      if let Err(e) = self.load_row(row, &record, &mut progress).await {
        progress.abandon();
        return Err(e);
      }
    }

    progress.finish();
    Ok(())
  }

  async fn load_row(
    &mut self,
    row: u64,
    cells: &csv::ByteRecord,
    progress: &mut Progress,
  ) -> Result<()> {
    let cells = decode_cells(cells);
    for (index, cell) in cells.iter().enumerate() {
      if let Cow::Owned(lossy) = cell {
        warn!(row, column = index, value = %lossy, "invalid utf-8 replaced");
      }
    }
    let mapped = self
      .mapper
      .map(&cells)
      .map_err(|source| Error::Row { row, source })?;

    for field in &mapped.defaulted {
      debug!(row, field = field.name(), "undetermined value left at default");
    }
    self.report.flags_defaulted += mapped.defaulted.len() as u64;

    let id = mapped.record.id.clone();
    let outcome = self
      .store
      .upsert(mapped.record)
      .await
      .map_err(|e| Error::Store { row, id: id.clone(), source: Box::new(e) })?;

    match outcome {
      UpsertOutcome::Inserted => self.report.inserted += 1,
      UpsertOutcome::Replaced => self.report.replaced += 1,
    }
    self.report.processed += 1;
    progress.record(&id);
    Ok(())
  }

  fn check_header(&self, header: &csv::ByteRecord) -> Result<()> {
    let layout = self.mapper.layout();
    let cells = decode_cells(header);
    let drift = layout.check_header(&cells);
    let Some(first) = drift.first() else {
      return Ok(());
    };

    if self.options.strict_header {
      return Err(Error::HeaderDrift {
        layout:      layout.name,
        count:       drift.len(),
        first_index: first.index,
        expected:    first.expected,
        found:       first.found.clone(),
      });
    }
    for m in &drift {
      warn!(
        column = m.index,
        expected = m.expected,
        found = m.found.as_deref().unwrap_or("<missing>"),
        "header differs from layout; mapping by position anyway"
      );
    }
    Ok(())
  }
}

/// Cells are decoded lossily: invalid UTF-8 becomes U+FFFD instead of
/// failing the row.
fn decode_cells(record: &csv::ByteRecord) -> Vec<Cow<'_, str>> {
  record.iter().map(String::from_utf8_lossy).collect()
}
