pub mod dip_detector;
pub mod notification_service;
pub mod product_service;
pub mod rate_limiter;
pub mod scan_scheduler;
pub mod scan_service;
