//! HTTP-level integration tests for the CTA banner endpoints.
//!
//! Requests go straight to the router via `tower::ServiceExt`; no TCP
//! listener is involved.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_empty, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/cta-banners", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_active(pool: &PgPool, variant: &str) -> i64 {
    let created = create(
        pool,
        json!({"name": "Live", "title": "Now live", "variant": variant, "status": "active"}),
    )
    .await;
    created["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_with_defaults(pool: PgPool) {
    let data = create(
        &pool,
        json!({"name": "Promo", "title": "Book a call", "variant": "sticky-top", "placement": []}),
    )
    .await;

    assert!(data["id"].is_number());
    assert_eq!(data["status"], "draft");
    assert_eq!(data["placement"], json!(["all"]));
    assert_eq!(data["showAfterScrollPx"], 300);
    assert_eq!(data["dismissible"], true);
    assert_eq!(data["colors"]["background"], "primary");
    assert_eq!(data["viewCount"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_normalizes_placement(pool: PgPool) {
    let data = create(
        &pool,
        json!({
            "name": "Blog",
            "title": "Subscribe",
            "variant": "slide-bottom",
            "placement": ["/blog/", "blog", " homepage "]
        }),
    )
    .await;

    assert_eq!(data["placement"], json!(["blog", "homepage"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_variant_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/cta-banners",
        json!({"name": "x", "title": "y", "variant": "marquee"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_bad_phone_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/cta-banners",
        json!({"name": "x", "title": "y", "variant": "sticky-top", "phoneNumber": "call us"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_color_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/cta-banners",
        json!({
            "name": "x", "title": "y", "variant": "sticky-top",
            "colors": {"background": "#ff0000", "buttonBackground": "white",
                       "buttonText": "primary", "text": "white"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Read / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_banner_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cta-banners/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    create(&pool, json!({"name": "a", "title": "A", "variant": "sticky-top"})).await;
    create_active(&pool, "banner-strip").await;

    let app = common::build_test_app(pool.clone());
    let all = body_json(get(app, "/api/v1/cta-banners").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let active = body_json(get(app, "/api/v1/cta-banners?status=active").await).await;
    let active = active["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["variant"], "banner-strip");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cta-banners?status=archived").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_respects_limit(pool: PgPool) {
    for name in ["a", "b", "c"] {
        create(&pool, json!({"name": name, "title": name, "variant": "sticky-top"})).await;
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/cta-banners?limit=2").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_given_fields_only(pool: PgPool) {
    let created = create(
        &pool,
        json!({"name": "Edit", "title": "Before", "variant": "corner-popup",
               "buttonUrl": "/pricing"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/cta-banners/{id}"),
        json!({"title": "After", "showAfterScrollPx": 0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["title"], "After");
    assert_eq!(data["showAfterScrollPx"], 0);
    assert_eq!(data["name"], "Edit");
    assert_eq!(data["buttonUrl"], "/pricing");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_with_invalid_variant_returns_400(pool: PgPool) {
    let id = create_active(&pool, "sticky-top").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/cta-banners/{id}"),
        json!({"variant": "popunder"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_missing_banner_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(app, "/api/v1/cta-banners/424242", json!({"title": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_returns_204_then_404(pool: PgPool) {
    let id = create_active(&pool, "sticky-bottom").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/cta-banners/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/cta-banners/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/cta-banners/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Embed + telemetry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn embed_serves_active_banner_config(pool: PgPool) {
    let id = create_active(&pool, "notification-bar").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/cta-banners/{id}/embed")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["id"], id);
    assert_eq!(data["variant"], "notification-bar");
    assert_eq!(data["status"], "active");
    assert!(data.get("viewCount").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn embed_of_draft_returns_404(pool: PgPool) {
    let created = create(&pool, json!({"name": "d", "title": "Draft", "variant": "sticky-top"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/cta-banners/{id}/embed")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn track_endpoints_increment_counters(pool: PgPool) {
    let id = create_active(&pool, "floating-button").await;

    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let response = post_empty(app, &format!("/api/v1/cta-banners/{id}/track-view")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, &format!("/api/v1/cta-banners/{id}/track-click")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let data = body_json(get(app, &format!("/api/v1/cta-banners/{id}")).await).await["data"].clone();
    assert_eq!(data["viewCount"], 2);
    assert_eq!(data["clickCount"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn track_missing_banner_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_empty(app, "/api/v1/cta-banners/31337/track-view").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
