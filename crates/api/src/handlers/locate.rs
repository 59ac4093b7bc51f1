//! Handler for IP geolocation lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use geoloc_core::error::CoreError;
use geoloc_core::geolocation::parse_ip_address;
use geoloc_db::models::geolocation::Geolocation;
use geoloc_db::repositories::GeolocationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, INVALID_IP_MESSAGE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocateIpRequest {
    pub ip_address: String,
}

#[derive(Debug, Serialize)]
pub struct LocateIpResponse {
    pub country: String,
    pub city: String,
    pub coordinates: CoordinatesResponse,
}

#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Geolocation> for LocateIpResponse {
    fn from(location: Geolocation) -> Self {
        Self {
            country: location.country.unwrap_or_default(),
            city: location.city.unwrap_or_default(),
            coordinates: CoordinatesResponse {
                latitude: location.coordinates.latitude,
                longitude: location.coordinates.longitude,
            },
        }
    }
}

/// POST /api/v1/ip/locate
///
/// Look up the stored location for an exact IP address. The address is
/// checked before the store is queried; it is matched as given, without
/// normalisation.
pub async fn locate_ip(
    State(state): State<AppState>,
    payload: Result<Json<LocateIpRequest>, JsonRejection>,
) -> AppResult<Json<LocateIpResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected locate request body");
        AppError::BadRequest(INVALID_IP_MESSAGE.to_string())
    })?;

    parse_ip_address(&body.ip_address)?;

    let location = GeolocationRepo::find_by_ip(&state.pool, &body.ip_address)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "location",
            key: body.ip_address.clone(),
        })?;

    Ok(Json(location.into()))
}
