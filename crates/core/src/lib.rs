//! Pure domain logic for the geolocation import pipeline.
//!
//! Nothing in this crate touches the database or performs async I/O. It
//! provides the row types, the validator, the per-run deduplicator, the typed
//! row accumulator, and the streaming CSV decoder that ties them together.

pub mod batch;
pub mod decoder;
pub mod dedup;
pub mod error;
pub mod geolocation;
pub mod types;
