use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::envelope::{resolve_network_passphrase, TESTNET_PASSPHRASE};

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub horizon: HorizonConfig,
    pub network: NetworkConfig,
}

/// Horizon account data API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonConfig {
    pub url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
    /// Upper bound on in-flight account fetches
    pub concurrent_requests: usize,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            url: "https://horizon-testnet.stellar.org".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
            concurrent_requests: 4,
        }
    }
}

/// Network the envelopes were signed for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Passphrase or preset name (`testnet`, `public`)
    pub passphrase: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            passphrase: TESTNET_PASSPHRASE.to_string(),
        }
    }
}

impl NetworkConfig {
    /// Passphrase with presets expanded
    pub fn resolved_passphrase(&self) -> String {
        resolve_network_passphrase(&self.passphrase)
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let horizon = HorizonConfig::default();
        let network = NetworkConfig::default();
        let config = Config::builder()
            .set_default("horizon.url", horizon.url)?
            .set_default("horizon.timeout_seconds", horizon.timeout_seconds)?
            .set_default("horizon.max_retries", horizon.max_retries as i64)?
            .set_default("horizon.initial_backoff_ms", horizon.initial_backoff_ms)?
            .set_default("horizon.backoff_multiplier", horizon.backoff_multiplier)?
            .set_default("horizon.max_backoff_seconds", horizon.max_backoff_seconds)?
            .set_default(
                "horizon.concurrent_requests",
                horizon.concurrent_requests as i64,
            )?
            .set_default("network.passphrase", network.passphrase)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.apply_env_overrides()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(_) => Ok(Self {
                horizon: HorizonConfig::default(),
                network: NetworkConfig::default(),
            }),
        }
    }

    /// HORIZON_URL, HORIZON_CONCURRENT_REQUESTS, HORIZON_TIMEOUT_SECONDS and
    /// STELLAR_NETWORK_PASSPHRASE override file settings
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("HORIZON_URL") {
            self.horizon.url = url;
        }

        if let Ok(limit) = env::var("HORIZON_CONCURRENT_REQUESTS") {
            self.horizon.concurrent_requests = limit.parse().map_err(|_| {
                ConfigError::Message(format!(
                    "HORIZON_CONCURRENT_REQUESTS must be a positive integer, got '{}'",
                    limit
                ))
            })?;
        }

        if let Ok(timeout) = env::var("HORIZON_TIMEOUT_SECONDS") {
            self.horizon.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Message(format!(
                    "HORIZON_TIMEOUT_SECONDS must be an integer, got '{}'",
                    timeout
                ))
            })?;
        }

        if let Ok(passphrase) = env::var("STELLAR_NETWORK_PASSPHRASE") {
            self.network.passphrase = passphrase;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon.concurrent_requests == 0 {
            return Err(ConfigError::Message(
                "horizon.concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.network.passphrase.trim().is_empty() {
            return Err(ConfigError::Message(
                "network.passphrase must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
