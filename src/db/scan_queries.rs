use crate::models::ScanRun;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn record_start(pool: &PgPool) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO scan_runs (status) VALUES ('running') RETURNING id",
    )
    .fetch_one(pool)
    .await
}

pub async fn record_success(
    pool: &PgPool,
    run_id: Uuid,
    scanned: i32,
    dips_found: i32,
    duration_ms: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE scan_runs
        SET status = 'success',
            scanned = $2,
            dips_found = $3,
            duration_ms = $4,
            completed_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(run_id)
    .bind(scanned)
    .bind(dips_found)
    .bind(duration_ms)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn record_failure(
    pool: &PgPool,
    run_id: Uuid,
    error_message: &str,
    duration_ms: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE scan_runs
        SET status = 'failed',
            error_message = $2,
            duration_ms = $3,
            completed_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(run_id)
    .bind(error_message)
    .bind(duration_ms)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_recent(pool: &PgPool, limit: i64) -> Result<Vec<ScanRun>, sqlx::Error> {
    sqlx::query_as::<_, ScanRun>(
        r#"
        SELECT * FROM scan_runs
        ORDER BY started_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
