//! Configuration types

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Strategy API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Query coordinator tuning
    #[serde(default)]
    pub coordinator: CoordinatorSettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Strategy API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the strategy API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Settings for the strategy query coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSettings {
    /// How long a cached response counts as fresh
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of strategies requested per query
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Minimum pool TVL (USD) sent with every query
    #[serde(default = "default_min_tvl")]
    pub min_tvl_usd: Decimal,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl(),
            result_limit: default_result_limit(),
            min_tvl_usd: default_min_tvl(),
        }
    }
}

impl CoordinatorSettings {
    /// Freshness window; values beyond chrono's range saturate
    pub fn cache_ttl(&self) -> Duration {
        i64::try_from(self.cache_ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_result_limit() -> u32 {
    200
}

fn default_min_tvl() -> Decimal {
    Decimal::from(1_000_000)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.coordinator.cache_ttl(), Duration::minutes(5));
        assert_eq!(config.coordinator.result_limit, 200);
        assert_eq!(config.coordinator.min_tvl_usd, Decimal::from(1_000_000));
        assert_eq!(config.settings.log_level, "info");
    }

    #[test]
    fn test_huge_cache_ttl_saturates() {
        let settings = CoordinatorSettings {
            cache_ttl_seconds: u64::MAX,
            ..CoordinatorSettings::default()
        };
        assert_eq!(settings.cache_ttl(), Duration::MAX);

        let settings = CoordinatorSettings {
            cache_ttl_seconds: i64::MAX as u64,
            ..CoordinatorSettings::default()
        };
        assert_eq!(settings.cache_ttl(), Duration::MAX);
    }

    #[test]
    fn test_partial_toml_like_input_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://api.example.org"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.org");
        assert_eq!(config.api.request_timeout_seconds, 30);
        assert_eq!(config.coordinator, CoordinatorSettings::default());
    }
}
