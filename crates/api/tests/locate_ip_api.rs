//! Integration tests for `POST /api/v1/ip/locate`.
//!
//! The store is seeded through the import pipeline, so these also check that
//! imported coordinates come back in the right axis order.

mod common;

use std::io::Cursor;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json, post_raw};
use geoloc_pipeline::{run_import, WriteHooks};
use serde_json::json;
use sqlx::PgPool;

const LOCATE: &str = "/api/v1/ip/locate";

const SEED: &str = "\
ip_address,country_code,country,city,latitude,longitude,mystery_value
200.106.141.15,SI,Nepal,DuBuquemouth,7.206435933364332,-84.87503094689836,7823011346
160.168.85.54,BO,Cuba,Mohamedview,-66.20896958745531,81.62948730878543,8879434387
2001:db8::1,CL,Chile,Arica,-18.4746,-70.29792,1
";

async fn seed(pool: &PgPool) {
    run_import(pool, Cursor::new(SEED), &WriteHooks::default())
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Found
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_returns_stored_location(pool: PgPool) {
    seed(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(app, LOCATE, json!({ "ip_address": "200.106.141.15" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "country": "Nepal",
            "city": "DuBuquemouth",
            "coordinates": {
                "latitude": 7.206435933364332,
                "longitude": -84.87503094689836
            }
        })
    );
}

// ---------------------------------------------------------------------------
// Rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_unknown_ip_returns_404(pool: PgPool) {
    seed(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(app, LOCATE, json!({ "ip_address": "33.173.188.3" })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "location not found" })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_invalid_ip_returns_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, LOCATE, json!({ "ip_address": "33.173.188" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "invalid IP address" })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_malformed_body_returns_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_raw(app, LOCATE, "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "invalid IP address" })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_missing_field_returns_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, LOCATE, json!({ "ip": "200.106.141.15" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locate_matches_address_text_exactly(pool: PgPool) {
    seed(&pool).await;

    let response = post_json(
        build_test_app(pool.clone()),
        LOCATE,
        json!({ "ip_address": "2001:db8::1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["city"], "Arica");

    // A valid spelling of the same address is a different key.
    let response = post_json(
        build_test_app(pool),
        LOCATE,
        json!({ "ip_address": "2001:0db8:0:0:0:0:0:1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "location not found" })
    );
}
