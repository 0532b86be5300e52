use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::db::alert_queries;
use crate::errors::AppError;
use crate::state::AppState;

const RECENT_ALERTS_LIMIT: i64 = 50;

pub fn router() -> Router<AppState> {
    Router::new().route("/alerts", get(list_alerts))
}

async fn list_alerts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let alerts = alert_queries::fetch_recent(&state.pool, RECENT_ALERTS_LIMIT).await?;
    Ok(Json(alerts))
}
