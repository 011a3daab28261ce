//! Application configuration.

use crate::error::{AppError, AppResult};
use hlwatch_schedule::SummaryPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the bot token. Secrets never live in
/// the TOML file.
const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST API info endpoint URL.
    #[serde(default = "default_info_url")]
    pub info_url: String,
    /// Telegram Bot API base URL (override for tests).
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    /// Polling cadence for the monitor loop, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Pause between addresses within a cycle, in milliseconds.
    /// A throughput knob for the outbound call rate, not a correctness
    /// requirement.
    #[serde(default = "default_address_pause_ms")]
    pub address_pause_ms: u64,
    /// Cool-down after an abandoned cycle, in seconds.
    #[serde(default = "default_cycle_cooldown_secs")]
    pub cycle_cooldown_secs: u64,
    /// Resize alert threshold as a percentage of the old size.
    #[serde(default = "default_resize_threshold_pct")]
    pub resize_threshold_pct: Decimal,
    /// Summary cadence policy.
    #[serde(default)]
    pub summary: SummaryPolicy,
}

fn default_info_url() -> String {
    hlwatch_feed::DEFAULT_INFO_URL.to_string()
}

fn default_telegram_api_url() -> String {
    hlwatch_telegram::DEFAULT_API_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_address_pause_ms() -> u64 {
    1000
}

fn default_cycle_cooldown_secs() -> u64 {
    60
}

fn default_resize_threshold_pct() -> Decimal {
    Decimal::from(10)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            info_url: default_info_url(),
            telegram_api_url: default_telegram_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
            address_pause_ms: default_address_pause_ms(),
            cycle_cooldown_secs: default_cycle_cooldown_secs(),
            resize_threshold_pct: default_resize_threshold_pct(),
            summary: SummaryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file is
    /// present.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("HLWATCH_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// The bot token, from the environment.
    pub fn bot_token(&self) -> AppResult<String> {
        std::env::var(TOKEN_ENV)
            .map_err(|_| AppError::Config(format!("{TOKEN_ENV} is not set")))
    }

    /// Resize threshold as a fraction (e.g. 10 -> 0.10).
    pub fn resize_threshold(&self) -> Decimal {
        self.resize_threshold_pct / Decimal::ONE_HUNDRED
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn address_pause(&self) -> Duration {
        Duration::from_millis(self.address_pause_ms)
    }

    pub fn cycle_cooldown(&self) -> Duration {
        Duration::from_secs(self.cycle_cooldown_secs)
    }
}
