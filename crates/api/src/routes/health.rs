//! `GET /health`, mounted at the root rather than under `/api/v1`.
//!
//! Always answers 200. A store that does not respond only turns the status
//! into `"degraded"`, so load balancers can tell "process up" from "lookups
//! will fail".

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_store_check(check: Result<(), sqlx::Error>) -> Self {
        let db_healthy = match check {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        };
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let check = geoloc_db::health_check(&state.pool).await;
    Json(HealthResponse::from_store_check(check))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_store_is_ok() {
        let response = HealthResponse::from_store_check(Ok(()));
        assert_eq!(response.status, "ok");
        assert!(response.db_healthy);
    }

    #[test]
    fn test_unreachable_store_is_degraded() {
        let response = HealthResponse::from_store_check(Err(sqlx::Error::PoolTimedOut));
        assert_eq!(response.status, "degraded");
        assert!(!response.db_healthy);
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
