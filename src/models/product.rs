use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked StockX product.
///
/// `dip_threshold` is the per-product alert threshold in percent (1-99);
/// NULL falls back to the process-wide default at scan time.
/// `reference_price` is the price observed at registration and is
/// display-only metadata: dip detection always uses the rolling median.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub dip_threshold: Option<f64>,
    pub reference_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub url: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateThresholdRequest {
    pub threshold: f64,
}

/// Product enriched with pricing context for the list view.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub dip_threshold: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub last_price: Option<f64>,
    pub reference_price: Option<f64>,
    pub discount_pct: Option<f64>,
}
