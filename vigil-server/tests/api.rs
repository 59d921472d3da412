mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use common::{record, FixedExtractor, TimedOutExtractor};
use serde_json::Value;
use tower::ServiceExt;
use vigil_server::routes::FORCE_SYNC_ACK;
use vigil_server::{router, AppState};
use vigil_store::MemoryStore;

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_advisories_returns_the_record_array() {
    let extractor = FixedExtractor {
        records: vec![
            record("Flood Warning Issued for X", "12 Jan 2024"),
            record("Cyclone Alert for Coastal Areas", "13 Jan 2024"),
        ],
    };
    let state = AppState::new(
        Arc::new(extractor),
        Arc::new(MemoryStore::new()),
        "advisories",
    );

    let response = get(router(state), "/get-advisories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body.as_array().expect("array payload");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Flood Warning Issued for X");
    assert_eq!(items[0]["date"], "12 Jan 2024");
    assert_eq!(items[0]["source"], "NDMA Pakistan");
}

#[tokio::test]
async fn extraction_failure_is_a_200_with_an_error_field() {
    let state = AppState::new(
        Arc::new(TimedOutExtractor),
        Arc::new(MemoryStore::new()),
        "advisories",
    );

    let response = get(router(state), "/get-advisories").await;
    // Failure is reported in the payload, never in the status line.
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error field");
    assert!(message.contains("timed out"));
}

#[tokio::test]
async fn force_sync_answers_with_the_fixed_ack() {
    let extractor = FixedExtractor {
        records: vec![record("Flood Warning Issued for X", "12 Jan 2024")],
    };
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Arc::new(extractor), store.clone(), "advisories");

    let response = get(router(state), "/force-sync").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], FORCE_SYNC_ACK);
    assert_eq!(store.document_count("advisories"), 1);
}

#[tokio::test]
async fn force_sync_ack_does_not_change_on_failure() {
    let state = AppState::new(
        Arc::new(TimedOutExtractor),
        Arc::new(MemoryStore::new()),
        "advisories",
    );

    let response = get(router(state), "/force-sync").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], FORCE_SYNC_ACK);
}
