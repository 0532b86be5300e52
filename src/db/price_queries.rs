use crate::models::PricePoint;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert(
    pool: &PgPool,
    product_id: Uuid,
    price: f64,
) -> Result<PricePoint, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        INSERT INTO price_history (product_id, price)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(price)
    .fetch_one(pool)
    .await
}

/// All points observed since `since`, oldest first.
pub async fn fetch_window(
    pool: &PgPool,
    product_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT * FROM price_history
        WHERE product_id = $1 AND scanned_at >= $2
        ORDER BY scanned_at ASC
        "#,
    )
    .bind(product_id)
    .bind(since)
    .fetch_all(pool)
    .await
}

pub async fn fetch_latest(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Option<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT * FROM price_history
        WHERE product_id = $1
        ORDER BY scanned_at DESC
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_oldest_price(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        r#"
        SELECT price FROM price_history
        WHERE product_id = $1
        ORDER BY scanned_at ASC
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
}
