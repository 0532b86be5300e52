use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use chrono::SecondsFormat;
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/test-telegram", get(test_telegram))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let next_scan = state
        .scheduler
        .next_scan_time()
        .await
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true));

    Json(json!({ "status": "ok", "next_scan": next_scan }))
}

/// Sends a test message so a fresh deployment can verify its bot config.
async fn test_telegram(State(state): State<AppState>) -> impl IntoResponse {
    match state.scan.notifier.send_test_message().await {
        Ok(()) => Json(json!({ "ok": true, "message": "Message envoyé" })),
        Err(e) => Json(json!({ "ok": false, "error": e.to_string() })),
    }
}
