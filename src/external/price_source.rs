use async_trait::async_trait;
use thiserror::Error;

/// Failure reasons are kept distinct so logs and future retry policies can
/// tell "not found" from "rate limited" from "malformed".
#[derive(Debug, Error)]
pub enum PriceSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("product not found upstream")]
    NotFound,

    #[error("rate limited upstream")]
    RateLimited,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0} not set")]
    Unconfigured(&'static str),
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current lowest ask for a product slug, in the configured currency.
    async fn lowest_ask(&self, slug: &str) -> Result<f64, PriceSourceError>;
}
