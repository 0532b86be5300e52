use crate::models::Product;
use sqlx::PgPool;

pub async fn create(
    pool: &PgPool,
    slug: &str,
    name: &str,
    dip_threshold: Option<f64>,
    reference_price: Option<f64>,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (slug, name, dip_threshold, reference_price)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(slug)
    .bind(name)
    .bind(dip_threshold)
    .bind(reference_price)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Returns false when no product carries the slug.
pub async fn update_threshold(
    pool: &PgPool,
    slug: &str,
    dip_threshold: f64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE products SET dip_threshold = $2 WHERE slug = $1")
        .bind(slug)
        .bind(dip_threshold)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a product; price history and alerts cascade.
pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
