//! Route definitions for the `/ip` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::locate;
use crate::state::AppState;

/// Routes mounted at `/ip`.
///
/// ```text
/// POST   /locate                        -> locate_ip
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/locate", post(locate::locate_ip))
}
