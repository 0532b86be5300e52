use std::str::FromStr;

/// Spacing between upstream price requests, per the Retailed rate contract.
pub const RATE_LIMIT_DELAY_SECS: u64 = 2;

/// sec min hour day month weekday
const DEFAULT_SCAN_SCHEDULE: &str = "0 0 */6 * * *";

/// Scan pipeline tuning, read once at startup.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Process-wide dip threshold in percent, used when a product has none.
    pub default_threshold_pct: f64,
    /// Minimum hours between two alerts for the same product.
    pub anti_spam_hours: i64,
    /// Trailing window feeding the reference median.
    pub window_days: i64,
    /// Cron expression for the periodic scan.
    pub schedule: String,
}

impl ScanConfig {
    pub fn from_env() -> Self {
        Self {
            default_threshold_pct: env_parse("DIP_THRESHOLD", 15.0),
            anti_spam_hours: env_parse("ANTI_SPAM_HOURS", 6),
            window_days: 30,
            schedule: std::env::var("SCAN_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_SCAN_SCHEDULE.to_string()),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_threshold_pct: 15.0,
            anti_spam_hours: 6,
            window_days: 30,
            schedule: DEFAULT_SCAN_SCHEDULE.to_string(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
