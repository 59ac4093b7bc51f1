//! Geolocation row types and the per-row validator.
//!
//! A [`RawRow`] is what the decoder produces for one source line. It becomes
//! a [`ValidatedRow`] only by passing [`RawRow::into_validated`], so the rest
//! of the pipeline can rely on the invariants below without re-checking them:
//!
//! - `ip_address` parses as an IPv4 or IPv6 address (compared as raw text,
//!   never canonicalised).
//! - `country_code`, `country` and `city` are non-empty.
//! - `latitude` is within [-90, 90] and `longitude` within [-180, 180],
//!   boundaries included. NaN is never in range.

use std::net::IpAddr;
use std::ops::Deref;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

// ── Types ────────────────────────────────────────────────────────────

/// One record as decoded from the source, before any semantic checks.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[validate(schema(function = "validate_finite_coordinates"))]
pub struct RawRow {
    #[validate(ip)]
    pub ip_address: String,
    #[validate(length(min = 1))]
    pub country_code: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub mystery_value: String,
}

/// A [`RawRow`] that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow(RawRow);

impl RawRow {
    /// Promote this row, or report every rule it breaks.
    pub fn into_validated(self) -> Result<ValidatedRow, ValidationErrors> {
        self.validate()?;
        Ok(ValidatedRow(self))
    }
}

impl ValidatedRow {
    pub fn into_inner(self) -> RawRow {
        self.0
    }
}

impl Deref for ValidatedRow {
    type Target = RawRow;

    fn deref(&self) -> &RawRow {
        &self.0
    }
}

// ── Pure Functions ───────────────────────────────────────────────────

/// Returns `true` if the row satisfies every rule.
pub fn is_valid(row: &RawRow) -> bool {
    row.validate().is_ok()
}

/// Parse a textual IP address, as the lookup path does before querying.
pub fn parse_ip_address(input: &str) -> Result<IpAddr, CoreError> {
    input
        .parse::<IpAddr>()
        .map_err(|_| CoreError::InvalidIpAddress(input.to_string()))
}

/// Range checks let NaN through, so it is rejected at the row level.
fn validate_finite_coordinates(row: &RawRow) -> Result<(), ValidationError> {
    if row.latitude.is_finite() && row.longitude.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
