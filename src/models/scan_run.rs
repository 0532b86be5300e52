use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One orchestrator run, scheduled or manual.
/// Status is 'running' until the run completes or fails.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScanRun {
    pub id: Uuid,
    pub status: String,
    pub scanned: i32,
    pub dips_found: i32,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
}
