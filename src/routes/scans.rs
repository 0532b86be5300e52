use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::db::scan_queries;
use crate::errors::AppError;
use crate::services::scan_service;
use crate::state::AppState;

const RECENT_SCANS_LIMIT: i64 = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(trigger_scan))
        .route("/scans", get(list_scans))
}

/// Run a scan synchronously and return its counts. 409 when a scan is
/// already in flight.
async fn trigger_scan(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("Manual scan triggered");
    let summary = scan_service::scan_all(&state.scan).await?;
    Ok(Json(summary))
}

async fn list_scans(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let runs = scan_queries::fetch_recent(&state.pool, RECENT_SCANS_LIMIT).await?;
    Ok(Json(runs))
}
