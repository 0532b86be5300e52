use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{alerts, health, products, scans};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(products::router())
        .merge(alerts::router())
        .merge(scans::router())
        .merge(health::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
