//! Core types for the IHP registrations loader.
//!
//! Holds the registration record, the column layout of the source extract,
//! the field coercers and the row mapper. This crate performs no I/O; the
//! storage backend lives behind [`store::RegistrationStore`].

pub mod coerce;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod record;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use layout::{ColumnLayout, ColumnSpec, IHP_V1};
pub use mapper::{MappedRow, RowMapper};
pub use record::{Field, RegistrationRecord};
pub use value::{Timestamp, Value, ValueKind};
