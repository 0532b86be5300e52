use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::external::price_source::{PriceSource, PriceSourceError};
use crate::services::rate_limiter::RateLimiter;

const PRODUCT_ENDPOINT: &str = "https://app.retailed.io/api/v1/scraper/stockx/product";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Retailed.io scraping API client for StockX lowest-ask prices.
///
/// Every request goes through the injected rate limiter; the upstream
/// contract is one request at a time with a fixed spacing between them.
pub struct RetailedClient {
    client: reqwest::Client,
    api_key: Option<String>,
    currency: String,
    country: String,
    limiter: Arc<RateLimiter>,
}

impl RetailedClient {
    pub fn from_env(limiter: Arc<RateLimiter>) -> Self {
        let api_key = std::env::var("RETAILED_API_KEY").ok();
        if api_key.is_none() {
            warn!("RETAILED_API_KEY not set, price fetches will fail until it is configured");
        }

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("failed to build Retailed HTTP client"),
            api_key,
            currency: std::env::var("RETAILED_CURRENCY").unwrap_or_else(|_| "EUR".to_string()),
            country: std::env::var("RETAILED_COUNTRY").unwrap_or_else(|_| "FR".to_string()),
            limiter,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RetailedProductResponse {
    market: Option<RetailedMarket>,
    #[serde(rename = "lowestAsk")]
    lowest_ask: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RetailedMarket {
    bids: Option<RetailedBids>,
}

#[derive(Debug, Deserialize)]
struct RetailedBids {
    lowest_ask: Option<f64>,
}

impl RetailedProductResponse {
    // The price normally lives under market.bids; older payloads carry a
    // top-level lowestAsk instead.
    fn into_price(self) -> Option<f64> {
        self.market
            .and_then(|m| m.bids)
            .and_then(|b| b.lowest_ask)
            .or(self.lowest_ask)
    }
}

#[async_trait]
impl PriceSource for RetailedClient {
    async fn lowest_ask(&self, slug: &str) -> Result<f64, PriceSourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PriceSourceError::Unconfigured("RETAILED_API_KEY"))?;

        let _gate = self.limiter.acquire().await;

        let resp = self
            .client
            .get(PRODUCT_ENDPOINT)
            .query(&[
                ("query", slug),
                ("currency", self.currency.as_str()),
                ("country", self.country.as_str()),
            ])
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|e| PriceSourceError::Network(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(PriceSourceError::RateLimited),
            reqwest::StatusCode::NOT_FOUND => return Err(PriceSourceError::NotFound),
            status if !status.is_success() => {
                return Err(PriceSourceError::Network(format!(
                    "upstream returned status {}",
                    status
                )));
            }
            _ => {}
        }

        let body: RetailedProductResponse = resp
            .json()
            .await
            .map_err(|e| PriceSourceError::Malformed(e.to_string()))?;

        body.into_price()
            .ok_or_else(|| PriceSourceError::Malformed("no lowest_ask in response".to_string()))
    }
}
