use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// One observed lowest-ask price for a product. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricePoint {
    pub id: Uuid,
    pub product_id: Uuid,
    pub price: f64,
    pub scanned_at: DateTime<Utc>,
}
