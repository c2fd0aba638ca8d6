//! Ledger account data provider
//!
//! The engine never talks to the network directly; it asks an
//! [`AccountDataProvider`] for account snapshots. The Horizon client is the
//! production implementation, [`StaticAccountProvider`] serves snapshots from
//! memory or from a JSON file of saved Horizon account records.

use crate::errors::{AppResult, FetchError, FetchResult};
use crate::types::AccountSnapshot;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Source of account thresholds and signer sets
#[async_trait]
pub trait AccountDataProvider: Send + Sync {
    /// Fetch the current state of an account
    async fn fetch_account(&self, account_id: &str) -> FetchResult<AccountSnapshot>;
}

#[async_trait]
impl<P: AccountDataProvider + ?Sized> AccountDataProvider for std::sync::Arc<P> {
    async fn fetch_account(&self, account_id: &str) -> FetchResult<AccountSnapshot> {
        (**self).fetch_account(account_id).await
    }
}

/// Fixed set of account snapshots
#[derive(Debug, Clone, Default)]
pub struct StaticAccountProvider {
    accounts: HashMap<String, AccountSnapshot>,
}

impl StaticAccountProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = AccountSnapshot>) -> Self {
        let mut provider = Self::new();
        for snapshot in snapshots {
            provider.insert(snapshot);
        }
        provider
    }

    /// Load a JSON array of Horizon account records
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshots: Vec<AccountSnapshot> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} account snapshots from {}",
            snapshots.len(),
            path.display()
        );
        Ok(Self::from_snapshots(snapshots))
    }

    pub fn insert(&mut self, snapshot: AccountSnapshot) {
        self.accounts.insert(snapshot.account_id.clone(), snapshot);
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountDataProvider for StaticAccountProvider {
    async fn fetch_account(&self, account_id: &str) -> FetchResult<AccountSnapshot> {
        match self.accounts.get(account_id) {
            Some(snapshot) => Ok(snapshot.clone()),
            None => {
                debug!("No snapshot for account {}", account_id);
                Err(FetchError::AccountNotFound {
                    account_id: account_id.to_string(),
                })
            }
        }
    }
}
