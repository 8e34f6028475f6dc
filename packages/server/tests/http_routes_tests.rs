//! Read-only HTTP surface over a migrated database.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{element_set, TestHarness};
use serde_json::Value;
use server_core::domains::element_sets::StoredElementSet;
use server_core::server::build_app;
use test_context::test_context;
use tower::ServiceExt;

async fn get_json(ctx: &TestHarness, uri: &str) -> (StatusCode, Value) {
    let response = build_app(ctx.db_pool.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn seed(ctx: &TestHarness) {
    StoredElementSet::save_batch(
        &[
            element_set(25544, "ISS (ZARYA)", "24045.50000000"),
            element_set(25544, "ISS (ZARYA)", "24046.50000000"),
            element_set(20580, "HST", "24040.00000000"),
        ],
        &ctx.db_pool,
    )
    .await
    .unwrap();
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_database_and_row_count(ctx: &TestHarness) {
    seed(ctx).await;

    let (status, body) = get_json(ctx, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["element_sets"], 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn current_element_sets_lists_latest_per_object(ctx: &TestHarness) {
    seed(ctx).await;

    let (status, body) = get_json(ctx, "/element-sets").await;

    assert_eq!(status, StatusCode::OK);
    let sets = body.as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1]["catalog_number"], 25544);
    assert_eq!(sets[1]["epoch"], "2024-02-15T12:00:00Z");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn lookup_by_catalog_number(ctx: &TestHarness) {
    seed(ctx).await;

    let (status, body) = get_json(ctx, "/element-sets/20580").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object_name"], "HST");

    let (status, body) = get_json(ctx, "/element-sets/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99999"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn lookup_by_name(ctx: &TestHarness) {
    seed(ctx).await;

    let (status, body) = get_json(ctx, "/element-sets/by-name/ISS%20(ZARYA)").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["catalog_number"], 25544);
    assert_eq!(body["epoch"], "2024-02-15T12:00:00Z");

    let (status, _) = get_json(ctx, "/element-sets/by-name/MIR").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
