//! `ihp-load` — load an IHP registrations extract into SQLite.
//!
//! Reads `ihp.toml` (or the path given with `--config`) and `IHP_*`
//! environment variables, then runs the requested command. With no command,
//! `load` is run with the configured paths.
//!
//! ```text
//! ihp-load load --source IHP.csv --store ihp.db
//! ihp-load show 0a1b2c3d-...
//! ihp-load count
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use ihp_core::{IHP_V1, store::RegistrationStore};
use ihp_ingest::{LoadOptions, Loader, LoaderConfig};
use ihp_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Load IHP registrations into SQLite")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "ihp.toml")]
  config: PathBuf,

  /// SQLite database file (overrides `store_path`).
  #[arg(long, global = true, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Insert or refresh every registration in the source extract.
  Load {
    /// Delimited extract to read (overrides `source_path`).
    #[arg(long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Do not draw a progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Abort if the header row does not match the column layout.
    #[arg(long)]
    strict_header: bool,
  },

  /// Print one stored registration as JSON.
  Show { id: String },

  /// Print the number of stored registrations.
  Count,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = LoaderConfig::load(&cli.config)
    .with_context(|| format!("failed to read config {}", cli.config.display()))?;
  if let Some(store) = cli.store {
    cfg.store_path = store;
  }

  tracing::info!(path = %cfg.store_path.display(), "opening store");
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command.unwrap_or(Command::Load {
    source:        None,
    no_progress:   false,
    strict_header: false,
  }) {
    Command::Load { source, no_progress, strict_header } => {
      if let Some(source) = source {
        cfg.source_path = source;
      }
      let options = LoadOptions {
        progress:      cfg.progress && !no_progress,
        strict_header: cfg.strict_header || strict_header,
      };

      let mut loader = Loader::new(&store, &IHP_V1, options)?;
      loader
        .run(&cfg.source_path)
        .await
        .with_context(|| format!("load of {} aborted", cfg.source_path.display()))?;
    }

    Command::Show { id } => {
      store.ensure_schema(IHP_V1.version).await?;
      let Some(record) = store.get(id.clone()).await? else {
        bail!("no registration with id {id:?}");
      };
      println!("{}", serde_json::to_string_pretty(&record)?);
    }

    Command::Count => {
      store.ensure_schema(IHP_V1.version).await?;
      println!("{}", store.count().await?);
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_is_accepted_after_the_subcommand() {
    let cli = Cli::try_parse_from(["ihp-load", "load", "--config", "x.toml"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("x.toml"));
    assert!(matches!(cli.command, Some(Command::Load { .. })));
  }

  #[test]
  fn global_flags_before_or_after() {
    let cli = Cli::try_parse_from(["ihp-load", "-c", "a.toml", "count", "--store", "b.db"])
      .unwrap();
    assert_eq!(cli.config, PathBuf::from("a.toml"));
    assert_eq!(cli.store, Some(PathBuf::from("b.db")));

    let cli = Cli::try_parse_from(["ihp-load"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("ihp.toml"));
    assert!(cli.command.is_none());
  }
}
