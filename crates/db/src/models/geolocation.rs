//! Geolocation entity and insert DTO.
//!
//! Maps to the `geolocations` table introduced in migration 000001. The
//! `coordinates` column is a Postgres `point` (x = longitude, y = latitude);
//! reads split it into two `float8` columns.

use geoloc_core::geolocation::ValidatedRow;
use geoloc_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A (longitude, latitude) pair.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Postgres `point` literal, `(x,y)`.
    pub fn to_point_literal(&self) -> String {
        format!("({},{})", self.longitude, self.latitude)
    }
}

/// A row from the `geolocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Geolocation {
    pub id: DbId,
    pub ip_address: String,
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    #[sqlx(flatten)]
    pub coordinates: Coordinates,
    pub mystery_value: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for bulk-inserting a geolocation; id and timestamp come from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeolocation {
    pub ip_address: String,
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub coordinates: Coordinates,
    pub mystery_value: Option<String>,
}

impl From<ValidatedRow> for NewGeolocation {
    fn from(row: ValidatedRow) -> Self {
        let row = row.into_inner();
        Self {
            ip_address: row.ip_address,
            country_code: non_empty(row.country_code),
            country: non_empty(row.country),
            city: non_empty(row.city),
            coordinates: Coordinates {
                longitude: row.longitude,
                latitude: row.latitude,
            },
            mystery_value: non_empty(row.mystery_value),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use geoloc_core::geolocation::RawRow;

    use super::*;

    fn validated(mystery_value: &str) -> ValidatedRow {
        RawRow {
            ip_address: "200.106.141.15".to_string(),
            country_code: "SI".to_string(),
            country: "Nepal".to_string(),
            city: "DuBuquemouth".to_string(),
            latitude: 7.206435933364332,
            longitude: -84.87503094689836,
            mystery_value: mystery_value.to_string(),
        }
        .into_validated()
        .unwrap()
    }

    #[test]
    fn test_from_validated_row_maps_coordinates() {
        let new = NewGeolocation::from(validated("7823011346"));
        assert_eq!(new.ip_address, "200.106.141.15");
        assert_eq!(new.country.as_deref(), Some("Nepal"));
        assert_eq!(new.coordinates.longitude, -84.87503094689836);
        assert_eq!(new.coordinates.latitude, 7.206435933364332);
        assert_eq!(new.mystery_value.as_deref(), Some("7823011346"));
    }

    #[test]
    fn test_empty_mystery_value_becomes_null() {
        let new = NewGeolocation::from(validated(""));
        assert!(new.mystery_value.is_none());
    }

    #[test]
    fn test_point_literal_is_longitude_first() {
        let coordinates = Coordinates {
            longitude: -84.5,
            latitude: 7.25,
        };
        assert_eq!(coordinates.to_point_literal(), "(-84.5,7.25)");
    }
}
