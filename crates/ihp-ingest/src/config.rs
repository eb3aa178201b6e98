//! Loader configuration.
//!
//! Layered, lowest priority first: built-in defaults, an optional TOML file,
//! then `IHP_*` environment variables (e.g. `IHP_STORE_PATH`). Command-line
//! flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
  /// Delimited extract to load.
  pub source_path:   PathBuf,
  /// SQLite database file; created if missing.
  pub store_path:    PathBuf,
  /// Draw a progress bar while streaming.
  pub progress:      bool,
  /// Abort when the header row does not match the layout instead of
  /// warning.
  pub strict_header: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      source_path:   PathBuf::from("IHP.csv"),
      store_path:    PathBuf::from("ihp.db"),
      progress:      true,
      strict_header: false,
    }
  }
}

impl LoaderConfig {
  /// Read `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(file, config::Environment::with_prefix("IHP"))
  }

  fn load_with_env(
    file: &Path,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, io::Write};

  use super::*;

  fn no_env() -> config::Environment {
    config::Environment::with_prefix("IHP").source(Some(HashMap::new()))
  }

  #[test]
  fn missing_file_gives_defaults() {
    let cfg =
      LoaderConfig::load_with_env(Path::new("/no/such/ihp.toml"), no_env()).unwrap();
    assert_eq!(cfg, LoaderConfig::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "source_path = \"exports/IHP-2024.csv\"").unwrap();
    writeln!(file, "progress = false").unwrap();
    file.flush().unwrap();

    let cfg = LoaderConfig::load_with_env(file.path(), no_env()).unwrap();
    assert_eq!(cfg.source_path, PathBuf::from("exports/IHP-2024.csv"));
    assert!(!cfg.progress);
    assert_eq!(cfg.store_path, PathBuf::from("ihp.db"));
  }

  #[test]
  fn environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "store_path = \"from-file.db\"").unwrap();
    file.flush().unwrap();

    let env = config::Environment::with_prefix("IHP").source(Some(HashMap::from([
      ("IHP_STORE_PATH".to_owned(), "from-env.db".to_owned()),
      ("IHP_STRICT_HEADER".to_owned(), "true".to_owned()),
    ])));

    let cfg = LoaderConfig::load_with_env(file.path(), env).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("from-env.db"));
    assert!(cfg.strict_header);
  }
}
