pub mod health;
pub mod ip;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ip/locate                                       locate (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/ip", ip::router())
}
