use crate::config::HorizonConfig;
use crate::errors::{FetchError, FetchResult};
use crate::horizon::{calculate_next_backoff, execute_with_timeout};
use crate::provider::AccountDataProvider;
use crate::types::AccountSnapshot;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Outcome of a single request attempt
enum AttemptError {
    /// Do not retry (account missing, unusable response)
    Fatal(FetchError),
    /// Transport failure, rate limit or server error
    Retryable(FetchError),
}

/// Horizon REST client with bounded concurrency and retry logic
#[derive(Clone)]
pub struct HorizonClient {
    http: reqwest::Client,
    config: HorizonConfig,
    semaphore: Arc<Semaphore>,
    error_count: Arc<AtomicU64>,
}

impl HorizonClient {
    pub fn new(config: HorizonConfig) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stellar-txn-inspector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let semaphore = Arc::new(Semaphore::new(config.concurrent_requests.max(1)));
        debug!(
            "Horizon client for {} with {} concurrent request limit",
            config.url, config.concurrent_requests
        );

        Ok(Self {
            http,
            config,
            semaphore,
            error_count: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    /// Get the configured concurrent request limit
    pub fn get_concurrent_limit(&self) -> usize {
        self.config.concurrent_requests
    }

    /// Get the number of failed attempts so far
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn account_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}",
            self.config.url.trim_end_matches('/'),
            account_id
        )
    }

    async fn fetch_with_retry(&self, account_id: &str) -> FetchResult<AccountSnapshot> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| FetchError::Network {
                message: format!("Failed to acquire semaphore: {}", e),
            })?;

        let mut attempts = 0;
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);

        loop {
            let outcome =
                execute_with_timeout(self.config.timeout_seconds, self.fetch_once(account_id))
                    .await;

            let last_error = match outcome {
                Ok(Ok(snapshot)) => {
                    if attempts > 0 {
                        debug!(
                            "Fetched account {} after {} attempts",
                            account_id,
                            attempts + 1
                        );
                    }
                    return Ok(snapshot);
                }
                Ok(Err(AttemptError::Fatal(e))) => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    debug!("Account {} fetch failed (non-retryable): {}", account_id, e);
                    return Err(e);
                }
                Ok(Err(AttemptError::Retryable(e))) => e,
                Err(_) => FetchError::Timeout {
                    timeout_seconds: self.config.timeout_seconds,
                    account_id: account_id.to_string(),
                },
            };

            attempts += 1;
            self.error_count.fetch_add(1, Ordering::Relaxed);

            if attempts > self.config.max_retries {
                error!(
                    "Failed to fetch account {} after {} attempts: {}",
                    account_id, attempts, last_error
                );
                return Err(match last_error {
                    FetchError::Timeout { .. } => last_error,
                    _ => FetchError::MaxRetriesExceeded {
                        operation: format!("fetch_account({}): {}", account_id, last_error),
                    },
                });
            }

            warn!(
                "Horizon attempt {} failed for account {}, retrying in {:?}: {}",
                attempts, account_id, backoff, last_error
            );
            sleep(backoff).await;

            backoff = calculate_next_backoff(
                backoff,
                self.config.backoff_multiplier,
                self.config.max_backoff_seconds,
            );
        }
    }

    async fn fetch_once(&self, account_id: &str) -> Result<AccountSnapshot, AttemptError> {
        let response = self
            .http
            .get(self.account_url(account_id))
            .send()
            .await
            .map_err(|e| {
                AttemptError::Retryable(FetchError::Network {
                    message: e.to_string(),
                })
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AttemptError::Fatal(FetchError::AccountNotFound {
                account_id: account_id.to_string(),
            }));
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(AttemptError::Retryable(FetchError::Network {
                message: format!("Horizon returned {}", status),
            }));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(FetchError::InvalidResponse(format!(
                "Horizon returned {} for account {}",
                status, account_id
            ))));
        }

        response.json::<AccountSnapshot>().await.map_err(|e| {
            AttemptError::Fatal(FetchError::InvalidResponse(format!(
                "Failed to decode account {}: {}",
                account_id, e
            )))
        })
    }
}

#[async_trait]
impl AccountDataProvider for HorizonClient {
    async fn fetch_account(&self, account_id: &str) -> FetchResult<AccountSnapshot> {
        self.fetch_with_retry(account_id).await
    }
}
