//! Account data providers with controllable behaviour

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use stellar_txn_inspector::errors::{FetchError, FetchResult};
use stellar_txn_inspector::provider::{AccountDataProvider, StaticAccountProvider};
use stellar_txn_inspector::types::AccountSnapshot;

/// Wraps a static provider, counting fetches per account and failing some with a network error
pub struct RecordingProvider {
    inner: StaticAccountProvider,
    unreachable: HashSet<String>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl RecordingProvider {
    pub fn new(snapshots: Vec<AccountSnapshot>) -> Self {
        Self {
            inner: StaticAccountProvider::from_snapshots(snapshots),
            unreachable: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_unreachable(mut self, account_id: &str) -> Self {
        self.unreachable.insert(account_id.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls_for(&self, account_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(account_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountDataProvider for RecordingProvider {
    async fn fetch_account(&self, account_id: &str) -> FetchResult<AccountSnapshot> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(account_id.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.contains(account_id) {
            return Err(FetchError::Network {
                message: "connection reset".to_string(),
            });
        }
        self.inner.fetch_account(account_id).await
    }
}

/// Never answers
pub struct HangingProvider;

#[async_trait]
impl AccountDataProvider for HangingProvider {
    async fn fetch_account(&self, _account_id: &str) -> FetchResult<AccountSnapshot> {
        std::future::pending().await
    }
}
