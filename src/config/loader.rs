//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{ApiConfig, AppConfig};
use crate::common::errors::{ClientError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. `APP__API__BASE_URL`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    if let Ok(url) = std::env::var("STRATEGY_SCOUT_API_URL") {
        app_config.api.base_url = url;
    }

    Ok(app_config)
}

/// Load configuration from environment variables only
///
/// Used when no configuration file is present.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    config_from_vars(|name| std::env::var(name).ok())
}

fn config_from_vars(var: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let mut api = ApiConfig::default();
    if let Some(url) = var("STRATEGY_SCOUT_API_URL") {
        api.base_url = url;
    }
    if let Some(timeout) = var("STRATEGY_SCOUT_TIMEOUT_SECONDS") {
        api.request_timeout_seconds = timeout.trim().parse().map_err(|e| {
            ClientError::Configuration(format!("Invalid STRATEGY_SCOUT_TIMEOUT_SECONDS: {}", e))
        })?;
    }

    Ok(AppConfig {
        api,
        ..AppConfig::default()
    })
}
