mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::config::{ScanConfig, RATE_LIMIT_DELAY_SECS};
use crate::external::price_source::PriceSource;
use crate::external::retailed::RetailedClient;
use crate::services::notification_service::{AlertNotifier, TelegramNotifier};
use crate::services::rate_limiter::RateLimiter;
use crate::services::scan_scheduler::ScanScheduler;
use crate::services::scan_service::ScanContext;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init(&logging::LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let scan_config = ScanConfig::from_env();

    let limiter = Arc::new(RateLimiter::fixed_delay(Duration::from_secs(
        RATE_LIMIT_DELAY_SECS,
    )));
    let price_source: Arc<dyn PriceSource> = Arc::new(RetailedClient::from_env(limiter));
    let notifier: Arc<dyn AlertNotifier> = Arc::new(TelegramNotifier::from_env());

    let scan = ScanContext::new(pool.clone(), price_source, notifier, scan_config.clone());
    let scheduler = Arc::new(ScanScheduler::start(scan.clone(), &scan_config.schedule).await?);

    let state = AppState {
        pool,
        scan,
        scheduler,
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8000u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 RADAR screener API running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
