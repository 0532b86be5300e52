use std::sync::Arc;

use sqlx::PgPool;

use crate::services::scan_scheduler::ScanScheduler;
use crate::services::scan_service::ScanContext;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub scan: ScanContext,
    pub scheduler: Arc<ScanScheduler>,
}
