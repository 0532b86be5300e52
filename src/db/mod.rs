pub mod alert_queries;
pub mod price_queries;
pub mod product_queries;
pub mod scan_queries;
