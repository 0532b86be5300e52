use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            loki_url: std::env::var("LOKI_URL").ok(),
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "radar".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}

/// Console logging via EnvFilter; when LOKI_URL is set (and the `loki`
/// feature is on) logs are also shipped to Loki from a background task.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "loki")]
    if let Some(loki_url) = &config.loki_url {
        let url = url::Url::parse(loki_url)?;
        let (loki_layer, task) = tracing_loki::builder()
            .label("service", config.service_name.as_str())?
            .label("environment", config.environment.as_str())?
            .build_url(url)?;

        tokio::spawn(task);

        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(&config.log_level))
            .with(tracing_subscriber::fmt::layer())
            .with(loki_layer)
            .init();

        tracing::info!("📊 Logging initialized, shipping to Loki at {}", loki_url);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(
        service = %config.service_name,
        environment = %config.environment,
        loki = config.loki_url.is_some(),
        "console-only logging initialized"
    );
    Ok(())
}
