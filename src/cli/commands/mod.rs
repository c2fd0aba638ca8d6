pub mod account;
pub mod inspect;

use crate::config::{AppConfig, HorizonConfig};
use crate::errors::{AppError, AppResult};
use tracing::{info, warn};

/// Load configuration, falling back to defaults when it cannot be read
pub(crate) fn load_config() -> AppResult<AppConfig> {
    match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            Ok(config)
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            info!("Using defaults and CLI arguments");
            AppConfig::get_defaults().map_err(|e| AppError::Config(e.to_string()))
        }
    }
}

/// Apply `--horizon-url` and `--concurrency` overrides
pub(crate) fn horizon_config(
    config: &AppConfig,
    url: Option<&str>,
    concurrent_requests: Option<usize>,
) -> HorizonConfig {
    let mut horizon = config.horizon.clone();
    if let Some(url) = url {
        horizon.url = url.to_string();
    }
    if let Some(limit) = concurrent_requests {
        horizon.concurrent_requests = limit;
    }
    horizon
}
