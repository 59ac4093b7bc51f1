//! Geolocation import pipeline.
//!
//! Ties the pure decoding stage from `geoloc_core` to the Postgres store:
//! decode the whole source into a batch, then write the batch in one
//! transaction. Row-level problems only show up in the discard count; source
//! and storage failures abort the run.

pub mod error;
pub mod import;
pub mod loader;

pub use error::{ImportError, LoadError};
pub use import::{import_file, run_import, ImportReport};
pub use loader::{load, WriteHooks};
