use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Alert;

const TELEGRAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{0} not set")]
    Unconfigured(&'static str),

    #[error("telegram request failed: {0}")]
    Transport(String),

    #[error("telegram rejected the message: status {0}")]
    Rejected(u16),
}

/// Delivery channel for dip alerts. Best-effort from the scan's point of
/// view: the orchestrator logs failures and moves on, the persisted alert
/// stands either way.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Configuration check, surfaced by the diagnostics endpoint.
    async fn send_test_message(&self) -> Result<(), NotifyError>;
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn from_env() -> Self {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok();
        if bot_token.is_none() || chat_id.is_none() {
            warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set, alerts will not be delivered");
        }

        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(TELEGRAM_TIMEOUT_SECS))
                .build()
                .expect("failed to build Telegram HTTP client"),
            bot_token,
            chat_id,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), NotifyError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or(NotifyError::Unconfigured("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = self
            .chat_id
            .as_deref()
            .ok_or(NotifyError::Unconfigured("TELEGRAM_CHAT_ID"))?;
        Ok((token, chat_id))
    }

    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let (token, chat_id) = self.credentials()?;
        let url = format!("https://api.telegram.org/bot{}/sendMessage", token);

        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }

        Ok(())
    }
}

pub fn format_alert_message(alert: &Alert) -> String {
    format!(
        "🚨 *TROU D'AIR DÉTECTÉ*\n\n\
         📦 *{}*\n\n\
         💰 Prix actuel : *${:.2}*\n\
         📊 Médiane 30j : ${:.2}\n\
         📉 Discount : *-{:.1}%*\n\n\
         👉 [Acheter sur StockX](https://stockx.com/{})",
        alert.product_name, alert.alert_price, alert.reference_price, alert.discount_pct, alert.slug
    )
}

#[async_trait]
impl AlertNotifier for TelegramNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.send_message(&format_alert_message(alert)).await?;
        info!("Telegram alert sent for {}", alert.product_name);
        Ok(())
    }

    async fn send_test_message(&self) -> Result<(), NotifyError> {
        self.send_message("✅ RADAR — Test réussi ! Le bot est configuré.")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_alert() -> Alert {
        Alert {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Labubu The Monsters Zimomo".to_string(),
            slug: "labubu-the-monsters-zimomo".to_string(),
            alert_price: 70.0,
            reference_price: 100.0,
            discount_pct: 30.0,
            triggered_at: Utc::now(),
        }
    }

    #[test]
    fn message_carries_prices_and_discount() {
        let message = format_alert_message(&sample_alert());

        assert!(message.contains("Labubu The Monsters Zimomo"));
        assert!(message.contains("$70.00"));
        assert!(message.contains("$100.00"));
        assert!(message.contains("-30.0%"));
    }

    #[test]
    fn message_links_to_the_product_page() {
        let message = format_alert_message(&sample_alert());

        assert!(message.contains("https://stockx.com/labubu-the-monsters-zimomo"));
    }

    #[tokio::test]
    async fn unconfigured_notifier_short_circuits() {
        let notifier = TelegramNotifier {
            client: reqwest::Client::new(),
            bot_token: None,
            chat_id: Some("42".to_string()),
        };

        match notifier.notify(&sample_alert()).await {
            Err(NotifyError::Unconfigured(var)) => assert_eq!(var, "TELEGRAM_BOT_TOKEN"),
            other => panic!("expected Unconfigured, got {other:?}"),
        }
    }
}
