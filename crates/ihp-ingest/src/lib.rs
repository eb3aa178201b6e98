//! Batch loader for IHP registration extracts.
//!
//! Reads a delimited extract row by row, maps each row through the
//! [`ihp_core`] column layout and upserts the resulting record into a
//! [`RegistrationStore`](ihp_core::store::RegistrationStore).

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod source;

pub use config::LoaderConfig;
pub use error::{Error, Result};
pub use pipeline::{LoadOptions, LoadReport, Loader, Phase};
