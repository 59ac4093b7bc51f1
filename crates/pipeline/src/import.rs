//! One import run: decode, validate, deduplicate, then bulk write.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::{Duration, Instant};

use geoloc_core::decoder::decode_batch;
use geoloc_db::DbPool;

use crate::error::ImportError;
use crate::loader::{load, WriteHooks};

/// Outcome of a successful import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows committed to the store.
    pub accepted: usize,
    /// Rows dropped as malformed, invalid, or repeated IP addresses.
    pub discarded: usize,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows accepted {}", self.accepted)?;
        writeln!(f, "rows discarded {}", self.discarded)?;
        write!(f, "time elapsed {:?}", self.elapsed)
    }
}

/// Import every record of `source` into the store.
///
/// The source is read to the end before anything is written. If it cannot
/// be decoded, or the write fails, nothing from this run is committed.
pub async fn run_import<R: Read>(
    pool: &DbPool,
    source: R,
    hooks: &WriteHooks<'_>,
) -> Result<ImportReport, ImportError> {
    let started = Instant::now();

    let batch = decode_batch(source)?;
    let accepted = batch.accepted_count();
    let discarded = batch.discarded_count();
    tracing::info!(accepted, discarded, "Source decoded, writing batch");

    load(pool, batch.into_rows(), hooks).await?;

    let report = ImportReport {
        accepted,
        discarded,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        accepted = report.accepted,
        discarded = report.discarded,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Import finished"
    );
    Ok(report)
}

/// Open `path` and import it with [`run_import`].
pub async fn import_file(
    pool: &DbPool,
    path: &Path,
    hooks: &WriteHooks<'_>,
) -> Result<ImportReport, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Importing geolocation dump");
    run_import(pool, BufReader::new(file), hooks).await
}
