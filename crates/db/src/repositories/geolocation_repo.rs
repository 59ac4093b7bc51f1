//! Repository for the `geolocations` table.

use sqlx::postgres::PgCopyIn;
use sqlx::{PgConnection, PgPool};

use crate::models::geolocation::{Geolocation, NewGeolocation};

/// Column list for reads; the point is split into longitude/latitude.
const COLUMNS: &str = "id, ip_address, country_code, country, city, \
    coordinates[0] AS longitude, coordinates[1] AS latitude, \
    mystery_value, created_at";

/// Column order of every record sent through `COPY`.
const COPY_COLUMNS: &str = "city, country, country_code, ip_address, coordinates, mystery_value";

/// Provides bulk insert and point lookup for geolocations.
pub struct GeolocationRepo;

impl GeolocationRepo {
    /// Stream `rows` into the table with a single `COPY ... FROM STDIN`.
    ///
    /// Records are sent in chunks of about [`COPY_CHUNK_BYTES`]. Runs on the
    /// caller's connection so it can be part of a transaction; the caller
    /// owns begin/commit. On any failure the copy is aborted and the error
    /// returned, leaving the transaction to be rolled back. Returns the
    /// number of rows copied.
    pub async fn copy_in(
        conn: &mut PgConnection,
        rows: &[NewGeolocation],
    ) -> Result<u64, sqlx::Error> {
        let statement =
            format!("COPY geolocations ({COPY_COLUMNS}) FROM STDIN WITH (FORMAT csv)");
        let mut copy = conn.copy_in_raw(&statement).await?;

        if let Err(e) = send_rows(&mut copy, rows).await {
            tracing::warn!(error = %e, "Aborting COPY");
            if let Err(abort_err) = copy.abort(e.to_string()).await {
                tracing::debug!(error = %abort_err, "COPY abort reported an error");
            }
            return Err(e);
        }

        copy.finish().await
    }

    /// Find a geolocation by exact IP address text.
    pub async fn find_by_ip(
        pool: &PgPool,
        ip_address: &str,
    ) -> Result<Option<Geolocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM geolocations WHERE ip_address = $1");
        sqlx::query_as::<_, Geolocation>(&query)
            .bind(ip_address)
            .fetch_optional(pool)
            .await
    }

    /// Total number of stored geolocations.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM geolocations")
            .fetch_one(pool)
            .await
    }
}

/// Flush threshold for buffered COPY data.
const COPY_CHUNK_BYTES: usize = 64 * 1024;

async fn send_rows(
    copy: &mut PgCopyIn<&mut PgConnection>,
    rows: &[NewGeolocation],
) -> Result<(), sqlx::Error> {
    let mut encoder = CopyEncoder::default();
    for row in rows {
        encoder.encode(row)?;
        if encoder.buffered() >= COPY_CHUNK_BYTES {
            copy.send(encoder.take()).await?;
        }
    }
    if encoder.buffered() > 0 {
        copy.send(encoder.take()).await?;
    }
    Ok(())
}

/// Buffers rows as CSV records in [`COPY_COLUMNS`] order.
///
/// `None` is written as an unquoted empty field, which `COPY ... (FORMAT csv)`
/// reads as NULL.
#[derive(Default)]
struct CopyEncoder {
    buf: Vec<u8>,
}

impl CopyEncoder {
    fn encode(&mut self, row: &NewGeolocation) -> Result<(), sqlx::Error> {
        let point = row.coordinates.to_point_literal();
        let record = [
            row.city.as_deref().unwrap_or_default(),
            row.country.as_deref().unwrap_or_default(),
            row.country_code.as_deref().unwrap_or_default(),
            row.ip_address.as_str(),
            point.as_str(),
            row.mystery_value.as_deref().unwrap_or_default(),
        ];

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut self.buf);
        writer
            .write_record(record)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        writer
            .flush()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}
