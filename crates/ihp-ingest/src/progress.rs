//! Progress reporting for a load: rows processed against the pre-scanned
//! total, plus the id most recently upserted.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
  "{bar:40.cyan/blue} {percent:>3}% {pos}/{len} [{elapsed_precise}] just upserted {msg}";

/// Purely observational; nothing here can fail a load.
pub struct Progress {
  bar:       ProgressBar,
  total:     u64,
  processed: u64,
}

impl Progress {
  /// `visible = false` keeps the counters but draws nothing.
  pub fn new(total: u64, visible: bool) -> Self {
    let bar = if visible { ProgressBar::new(total) } else { ProgressBar::hidden() };
    bar.set_style(
      ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    Self { bar, total, processed: 0 }
  }

  /// Note one successfully upserted row.
  pub fn record(&mut self, id: &str) {
    self.processed += 1;
    // The pre-scan is an estimate; never let the bar run past its end.
    if self.processed > self.total {
      self.total = self.processed;
      self.bar.set_length(self.total);
    }
    self.bar.set_position(self.processed);
    self.bar.set_message(id.to_owned());
  }

  pub fn processed(&self) -> u64 { self.processed }

  pub fn total(&self) -> u64 { self.total }

  pub fn percent(&self) -> f64 {
    if self.total == 0 {
      return 0.0;
    }
    self.processed as f64 / self.total as f64 * 100.0
  }

  pub fn finish(&self) { self.bar.finish(); }

  /// Leave the bar where it stopped, for a run that aborted.
  pub fn abandon(&self) { self.bar.abandon(); }
}
