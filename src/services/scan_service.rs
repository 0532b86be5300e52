use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::ScanConfig;
use crate::db::{alert_queries, price_queries, product_queries, scan_queries};
use crate::errors::AppError;
use crate::external::price_source::PriceSource;
use crate::models::{NewAlert, Product};
use crate::services::dip_detector::{self, DipDecision};
use crate::services::notification_service::AlertNotifier;

/// Everything a scan needs, wired once at startup. The scheduler and the
/// manual trigger share the same context, so both run the same pipeline.
#[derive(Clone)]
pub struct ScanContext {
    pub pool: PgPool,
    pub price_source: Arc<dyn PriceSource>,
    pub notifier: Arc<dyn AlertNotifier>,
    pub config: ScanConfig,
    // Single in-flight scan; a trigger that loses the race is dropped.
    in_flight: Arc<Mutex<()>>,
}

impl ScanContext {
    pub fn new(
        pool: PgPool,
        price_source: Arc<dyn PriceSource>,
        notifier: Arc<dyn AlertNotifier>,
        config: ScanConfig,
    ) -> Self {
        Self {
            pool,
            price_source,
            notifier,
            config,
            in_flight: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScanSummary {
    pub scanned: i32,
    pub dips_found: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub price_updated: bool,
    pub alert_sent: bool,
}

/// Scan every tracked product sequentially, recording the run in
/// `scan_runs`. Price fetch failures skip the product; store failures
/// abort the whole run.
pub async fn scan_all(ctx: &ScanContext) -> Result<ScanSummary, AppError> {
    let _guard = match ctx.in_flight.try_lock() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("A scan is already in flight, dropping this trigger");
            return Err(AppError::ScanInProgress);
        }
    };

    let products = product_queries::fetch_all(&ctx.pool).await?;
    if products.is_empty() {
        info!("No products to scan");
        return Ok(ScanSummary {
            scanned: 0,
            dips_found: 0,
        });
    }

    info!("Scanning {} products", products.len());

    let run_id = scan_queries::record_start(&ctx.pool).await?;
    let started_at = Utc::now();

    let mut scanned = 0;
    let mut dips_found = 0;
    let mut fatal: Option<AppError> = None;

    for product in &products {
        match scan_one(ctx, product).await {
            Ok(outcome) => {
                if outcome.price_updated {
                    scanned += 1;
                }
                if outcome.alert_sent {
                    dips_found += 1;
                }
            }
            Err(e) => {
                error!("Aborting scan, store failure on {}: {}", product.slug, e);
                fatal = Some(e);
                break;
            }
        }
    }

    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    match fatal {
        None => {
            scan_queries::record_success(&ctx.pool, run_id, scanned, dips_found, duration_ms)
                .await?;
            info!(
                "Scan complete: {} products scanned, {} dips found ({}ms)",
                scanned, dips_found, duration_ms
            );
            Ok(ScanSummary {
                scanned,
                dips_found,
            })
        }
        Some(e) => {
            if let Err(db_err) =
                scan_queries::record_failure(&ctx.pool, run_id, &e.to_string(), duration_ms).await
            {
                error!("Failed to record scan failure: {}", db_err);
            }
            Err(e)
        }
    }
}

/// Fetch, persist, detect, suppress, alert for one product.
///
/// The returned outcome reports whether a price point was written and
/// whether a new alert was raised. An `Err` means the store is unusable;
/// everything upstream of the store is handled here.
pub async fn scan_one(ctx: &ScanContext, product: &Product) -> Result<ScanOutcome, AppError> {
    const NOTHING: ScanOutcome = ScanOutcome {
        price_updated: false,
        alert_sent: false,
    };
    const PRICE_ONLY: ScanOutcome = ScanOutcome {
        price_updated: true,
        alert_sent: false,
    };

    let price = match ctx.price_source.lowest_ask(&product.slug).await {
        Ok(price) => price,
        Err(e) => {
            warn!("Price fetch failed for {}: {}", product.slug, e);
            return Ok(NOTHING);
        }
    };

    price_queries::insert(&ctx.pool, product.id, price).await?;

    let since = Utc::now() - Duration::days(ctx.config.window_days);
    let window = price_queries::fetch_window(&ctx.pool, product.id, since).await?;
    let values: Vec<f64> = window.iter().map(|point| point.price).collect();

    let threshold = product
        .dip_threshold
        .unwrap_or(ctx.config.default_threshold_pct);

    let (reference_price, discount_pct) = match dip_detector::detect(&values, price, threshold) {
        DipDecision::InsufficientData | DipDecision::NoDip { .. } => return Ok(PRICE_ONLY),
        DipDecision::Dip {
            reference_price,
            discount_pct,
        } => (reference_price, discount_pct),
    };

    if alert_queries::has_recent_alert(&ctx.pool, product.id, ctx.config.anti_spam_hours).await? {
        info!(
            "Dip on {} suppressed, already alerted within the last {}h",
            product.slug, ctx.config.anti_spam_hours
        );
        return Ok(PRICE_ONLY);
    }

    let alert = alert_queries::insert(
        &ctx.pool,
        &NewAlert {
            product_id: product.id,
            product_name: product.name.clone(),
            slug: product.slug.clone(),
            alert_price: price,
            reference_price,
            discount_pct,
        },
    )
    .await?;

    info!(
        "Dip alert for {}: {:.2} is {:.1}% below the 30d median {:.2}",
        product.slug, price, discount_pct, reference_price
    );

    // The alert is raised once persisted; delivery is best-effort.
    if let Err(e) = ctx.notifier.notify(&alert).await {
        warn!("Failed to deliver alert for {}: {}", product.slug, e);
    }

    Ok(ScanOutcome {
        price_updated: true,
        alert_sent: true,
    })
}
