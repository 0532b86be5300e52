use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A raised dip alert. `product_name` and `slug` are snapshots taken at
/// trigger time so the row stays meaningful after the product is deleted
/// or renamed; `reference_price` is the 30-day median that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub slug: String,
    pub alert_price: f64,
    pub reference_price: f64,
    pub discount_pct: f64,
    pub triggered_at: DateTime<Utc>,
}

/// Alert fields computed by the scan before the row exists.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub product_id: Uuid,
    pub product_name: String,
    pub slug: String,
    pub alert_price: f64,
    pub reference_price: f64,
    pub discount_pct: f64,
}
