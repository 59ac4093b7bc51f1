//! Streaming CSV decoder for geolocation dumps.
//!
//! The source must start with a header naming every column in [`HEADER`].
//! After that each line is decoded on demand into a [`RawRow`]. Lines that
//! cannot be decoded (wrong field count, non-numeric coordinates, bad UTF-8)
//! come back as [`DecodedRecord::Malformed`] and decoding carries on with the
//! next line. Only a missing/unreadable header or an I/O failure is fatal.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::batch::RowAccumulator;
use crate::dedup::Deduplicator;
use crate::error::StreamError;
use crate::geolocation::{RawRow, ValidatedRow};

/// Column names the header must contain.
pub const HEADER: [&str; 7] = [
    "ip_address",
    "country_code",
    "country",
    "city",
    "latitude",
    "longitude",
    "mystery_value",
];

/// Outcome of decoding one data line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRecord {
    Row { line: u64, row: RawRow },
    Malformed { line: u64, reason: String },
}

/// Forward-only, one-record-at-a-time reader over a CSV source.
pub struct CsvDecoder<R: Read> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    record: StringRecord,
    finished: bool,
}

impl<R: Read> CsvDecoder<R> {
    /// Read and check the header. Fails if the source is unreadable or the
    /// header lacks any required column.
    pub fn new(source: R) -> Result<Self, StreamError> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| StreamError(format!("failed to read header: {e}")))?
            .clone();

        if let Some(missing) = HEADER
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(StreamError(format!(
                "header is missing required column `{missing}`"
            )));
        }

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            finished: false,
        })
    }

    fn decode_current(&self, line: u64) -> DecodedRecord {
        if self.record.len() != self.headers.len() {
            return DecodedRecord::Malformed {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    self.headers.len(),
                    self.record.len()
                ),
            };
        }

        match self.record.deserialize::<RawRow>(Some(&self.headers)) {
            Ok(row) => DecodedRecord::Row { line, row },
            Err(e) => DecodedRecord::Malformed {
                line,
                reason: e.to_string(),
            },
        }
    }
}

impl<R: Read> Iterator for CsvDecoder<R> {
    type Item = Result<DecodedRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                let line = self.record.position().map_or(0, |p| p.line());
                Some(Ok(self.decode_current(line)))
            }
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) if e.is_io_error() => {
                self.finished = true;
                Some(Err(StreamError(format!("failed to read source: {e}"))))
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                Some(Ok(DecodedRecord::Malformed {
                    line,
                    reason: e.to_string(),
                }))
            }
        }
    }
}

/// Decode a whole source into a batch of validated, unique rows.
///
/// Every rejected line (malformed, invalid, or a repeated IP address) bumps
/// the discard counter. On a fatal error no batch is returned at all.
pub fn decode_batch<R: Read>(
    source: R,
) -> Result<RowAccumulator<ValidatedRow>, StreamError> {
    let decoder = CsvDecoder::new(source)?;
    let mut batch = RowAccumulator::new();
    let mut dedup = Deduplicator::new();

    for record in decoder {
        let (line, row) = match record? {
            DecodedRecord::Row { line, row } => (line, row),
            DecodedRecord::Malformed { line, reason } => {
                tracing::trace!(line, %reason, "Discarding malformed record");
                batch.increment_discarded();
                continue;
            }
        };

        let row = match row.into_validated() {
            Ok(row) => row,
            Err(errors) => {
                tracing::trace!(line, %errors, "Discarding invalid record");
                batch.increment_discarded();
                continue;
            }
        };

        if !dedup.admit(&row.ip_address) {
            tracing::trace!(line, ip = %row.ip_address, "Discarding duplicate IP address");
            batch.increment_discarded();
            continue;
        }

        batch.append(row);
    }

    tracing::debug!(
        records = batch.total_count(),
        accepted = batch.accepted_count(),
        discarded = batch.discarded_count(),
        distinct_ips = dedup.distinct_count(),
        "Source decoded"
    );
    Ok(batch)
}
