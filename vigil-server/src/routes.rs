//! HTTP surface of the serving shell.
//!
//! Both routes mirror the original service contract: HTTP 200 always, with
//! failures reported inside the payload rather than the status line, and
//! CORS open to any origin.

use crate::state::AppState;
use crate::sync::run_sync_cycle;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Fixed acknowledgement returned by `/force-sync` regardless of how many
/// records were written or skipped.
pub const FORCE_SYNC_ACK: &str = "Manual sync completed and pushed to Firebase";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get-advisories", get(get_advisories))
        .route("/force-sync", get(force_sync))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run an extraction and return the records, or `{"error": ...}`.
///
/// Callers must detect failure via the payload shape; a zero-length
/// success and an error differ only in the presence of `error`.
async fn get_advisories(State(state): State<AppState>) -> Json<Value> {
    match state.extractor.extract().await {
        Ok(records) => Json(json!(records)),
        Err(err) => {
            warn!(target: "server", error = %err, "server.get_advisories_failed");
            Json(json!({ "error": err.to_string() }))
        }
    }
}

/// Run extract-then-sync and answer with the fixed acknowledgement.
async fn force_sync(State(state): State<AppState>) -> Json<Value> {
    match run_sync_cycle(&state).await {
        Ok(written) => {
            info!(target: "server", written, "server.force_sync_complete");
        }
        Err(err) => {
            warn!(target: "server", error = %err, "server.force_sync_failed");
        }
    }
    Json(json!({ "status": FORCE_SYNC_ACK }))
}
