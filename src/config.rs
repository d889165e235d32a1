use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use crate::error::ConfigError;
use crate::models::TronAddress;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub tron: TronConfig,
    pub thresholds: ThresholdConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

/// Telegram delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token (required)
    pub bot_token: String,
    /// Destination chat id or @channel name (required)
    pub chat_id: String,
    /// Bot API base URL
    pub api_url: String,
}

/// TronGrid / account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TronConfig {
    /// Monitored account, Base58Check (required)
    pub address: String,
    /// TronGrid API key, sent only when non-empty
    pub api_key: String,
    /// TronGrid base URL
    pub api_url: String,
    /// Block explorer base URL used in notification links
    pub explorer_url: String,
    /// Tracked TRC-20 contract, hex
    pub token_contract: String,
    pub token_symbol: String,
    /// Timeout for the transaction fetch in seconds
    pub request_timeout_seconds: u64,
}

/// Notification thresholds in major units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub min_trx: f64,
    pub min_token: f64,
}

/// Driver loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Pause between successful polls
    pub poll_interval_seconds: u64,
    /// Pause after a failed poll
    pub error_backoff_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_url: "https://api.telegram.org".to_string(),
        }
    }
}

impl Default for TronConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            api_key: String::new(),
            api_url: "https://api.trongrid.io".to_string(),
            explorer_url: "https://tronscan.org".to_string(),
            // USDT (TRC-20)
            token_contract: "a614f803b6fd780986a42c78ec9c7f77e6ded13c".to_string(),
            token_symbol: "USDT".to_string(),
            request_timeout_seconds: 20,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_trx: 1.0,
            min_token: 1.0,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 15,
            error_backoff_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    /// Environment variables take precedence over file values
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file, falling back to defaults when absent
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.clone()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // Telegram
        if let Ok(token) = env::var("TG_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Ok(chat_id) = env::var("CHAT_ID") {
            self.telegram.chat_id = chat_id;
        }
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            self.telegram.api_url = url;
        }

        // TRON
        if let Ok(address) = env::var("TRON_ADDR") {
            self.tron.address = address;
        }
        if let Ok(key) = env::var("TRONGRID_KEY") {
            self.tron.api_key = key;
        }
        if let Ok(url) = env::var("TRONGRID_URL") {
            self.tron.api_url = url;
        }
        if let Ok(url) = env::var("TRONSCAN_URL") {
            self.tron.explorer_url = url;
        }
        if let Ok(contract) = env::var("TOKEN_CONTRACT") {
            self.tron.token_contract = contract;
        }
        if let Ok(symbol) = env::var("TOKEN_SYMBOL") {
            self.tron.token_symbol = symbol;
        }
        if let Some(timeout) = parse_env("REQUEST_TIMEOUT_SECONDS")? {
            self.tron.request_timeout_seconds = timeout;
        }

        // Thresholds
        if let Some(min_trx) = parse_env("MIN_TRX")? {
            self.thresholds.min_trx = min_trx;
        }
        if let Some(min_token) = parse_env("MIN_USDT")? {
            self.thresholds.min_token = min_token;
        }

        // Polling
        if let Some(interval) = parse_env("POLL_INTERVAL_SECONDS")? {
            self.polling.poll_interval_seconds = interval;
        }
        if let Some(backoff) = parse_env("ERROR_BACKOFF_SECONDS")? {
            self.polling.error_backoff_seconds = backoff;
        }

        // Logging
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Required values first, so a blank environment reports what is missing
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("TG_TOKEN".to_string()));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("CHAT_ID".to_string()));
        }
        if self.tron.address.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("TRON_ADDR".to_string()));
        }

        self.monitored_address()?;

        for url in [&self.telegram.api_url, &self.tron.api_url, &self.tron.explorer_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        if self.tron.token_contract.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tron.token_contract".to_string(),
                value: self.tron.token_contract.clone(),
            });
        }

        if self.tron.request_timeout_seconds == 0 || self.tron.request_timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "tron.request_timeout_seconds".to_string(),
                value: self.tron.request_timeout_seconds.to_string(),
            });
        }

        for (key, value) in [
            ("thresholds.min_trx", self.thresholds.min_trx),
            ("thresholds.min_token", self.thresholds.min_token),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if self.polling.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "polling.poll_interval_seconds".to_string(),
                value: self.polling.poll_interval_seconds.to_string(),
            });
        }
        if self.polling.error_backoff_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "polling.error_backoff_seconds".to_string(),
                value: self.polling.error_backoff_seconds.to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// The monitored account decoded into its raw form
    pub fn monitored_address(&self) -> Result<TronAddress, ConfigError> {
        TronAddress::parse(&self.tron.address).map_err(|e| ConfigError::InvalidValue {
            key: "TRON_ADDR".to_string(),
            value: format!("{} ({})", self.tron.address, e),
        })
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
