use crate::models::{Alert, NewAlert};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert(pool: &PgPool, alert: &NewAlert) -> Result<Alert, sqlx::Error> {
    sqlx::query_as::<_, Alert>(
        r#"
        INSERT INTO alerts (
            product_id, product_name, slug, alert_price, reference_price, discount_pct
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(alert.product_id)
    .bind(&alert.product_name)
    .bind(&alert.slug)
    .bind(alert.alert_price)
    .bind(alert.reference_price)
    .bind(alert.discount_pct)
    .fetch_one(pool)
    .await
}

/// True when the product already alerted inside the anti-spam window.
pub async fn has_recent_alert(
    pool: &PgPool,
    product_id: Uuid,
    cooldown_hours: i64,
) -> Result<bool, sqlx::Error> {
    let since = Utc::now() - Duration::hours(cooldown_hours);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM alerts WHERE product_id = $1 AND triggered_at >= $2",
    )
    .bind(product_id)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn fetch_recent(pool: &PgPool, limit: i64) -> Result<Vec<Alert>, sqlx::Error> {
    sqlx::query_as::<_, Alert>(
        r#"
        SELECT * FROM alerts
        ORDER BY triggered_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
