//! Account requirement resolution
//!
//! Resolution is split in three steps so that only one of them touches the
//! network:
//! 1. [`transaction_demands`] classifies every operation and lists which
//!    account must authorize at which tier (pure, may abort)
//! 2. [`fetch_accounts`] fetches each distinct account once, concurrently,
//!    into a read-only [`AccountSnapshots`]
//! 3. [`build_requirements`] folds the demands over the snapshots into one
//!    requirement per account (pure)

use super::classifier::classify;
use crate::errors::AnalysisError;
use crate::provider::AccountDataProvider;
use crate::types::{
    AccountFetchFailure, AccountSnapshot, AuthorizationRequirement, ThresholdLevel, Transaction,
};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One account's need to authorize at a given tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDemand {
    pub account_id: String,
    pub level: ThresholdLevel,
}

impl AccountDemand {
    pub fn new(account_id: impl Into<String>, level: ThresholdLevel) -> Self {
        Self {
            account_id: account_id.into(),
            level,
        }
    }
}

/// Classify every operation and list the authorizations the transaction needs.
///
/// The transaction source always needs a low-tier (sequence bump)
/// authorization. Operations without an explicit source are covered by that
/// seed; they are still classified so that an unknown type aborts the run.
pub fn transaction_demands(tx: &Transaction) -> Result<Vec<AccountDemand>, AnalysisError> {
    let mut demands = vec![AccountDemand::new(tx.source.clone(), ThresholdLevel::Low)];

    for (index, operation) in tx.operations.iter().enumerate() {
        let level = classify(operation.operation_type).map_err(|e| {
            AnalysisError::UnknownOperationType {
                index,
                operation_type: e.0.to_string(),
            }
        })?;

        if let Some(source) = &operation.source {
            demands.push(AccountDemand::new(source.clone(), level));
        }
    }

    Ok(demands)
}

/// Distinct account ids in first-seen order
pub fn distinct_accounts(demands: &[AccountDemand]) -> Vec<String> {
    let mut seen = HashSet::new();
    demands
        .iter()
        .filter(|demand| seen.insert(demand.account_id.as_str()))
        .map(|demand| demand.account_id.clone())
        .collect()
}

/// Accounts fetched for one run, plus the ones that could not be fetched
#[derive(Debug, Clone, Default)]
pub struct AccountSnapshots {
    accounts: HashMap<String, AccountSnapshot>,
    failures: Vec<AccountFetchFailure>,
}

impl AccountSnapshots {
    pub fn get(&self, account_id: &str) -> Option<&AccountSnapshot> {
        self.accounts.get(account_id)
    }

    pub fn failures(&self) -> &[AccountFetchFailure] {
        &self.failures
    }

    pub fn insert(&mut self, snapshot: AccountSnapshot) {
        self.accounts.insert(snapshot.account_id.clone(), snapshot);
    }

    pub fn record_failure(&mut self, failure: AccountFetchFailure) {
        self.failures.push(failure);
    }
}

/// Fetch each account once with at most `concurrency` requests in flight.
///
/// Failures are recorded per account, in the order the accounts were given.
pub async fn fetch_accounts<P>(
    provider: &P,
    account_ids: &[String],
    concurrency: usize,
) -> AccountSnapshots
where
    P: AccountDataProvider + ?Sized,
{
    debug!(
        "Fetching {} accounts with concurrent limit: {}",
        account_ids.len(),
        concurrency
    );

    let results: Vec<_> = stream::iter(account_ids.iter())
        .map(|account_id| async move { (account_id, provider.fetch_account(account_id).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut snapshots = AccountSnapshots::default();
    for (account_id, result) in results {
        match result {
            Ok(mut snapshot) => {
                // Key by the id we asked for, whatever the provider echoes back
                snapshot.account_id = account_id.clone();
                snapshots.insert(snapshot);
            }
            Err(e) => {
                warn!("Unable to fetch account {}: {}", account_id, e);
                snapshots.record_failure(AccountFetchFailure::from_error(account_id.as_str(), &e));
            }
        }
    }

    snapshots
}

/// Fold demands into one requirement per resolved account.
///
/// The first demand for an account creates its entry; later demands raise
/// the required weight when their tier's threshold is higher. Accounts
/// missing from `snapshots` are skipped.
pub fn build_requirements(
    demands: &[AccountDemand],
    snapshots: &AccountSnapshots,
) -> Vec<AuthorizationRequirement> {
    let (requirements, _) = demands.iter().fold(
        (Vec::<AuthorizationRequirement>::new(), HashMap::<&str, usize>::new()),
        |(mut requirements, mut index), demand| {
            let Some(snapshot) = snapshots.get(&demand.account_id) else {
                return (requirements, index);
            };
            let weight = u32::from(snapshot.thresholds.for_level(demand.level));

            match index.get(demand.account_id.as_str()) {
                Some(&position) => {
                    let existing = &mut requirements[position];
                    existing.threshold = existing.threshold.max(demand.level);
                    if weight > existing.required_weight {
                        debug!(
                            "Raising requirement for {} from {} to {} ({} tier)",
                            demand.account_id, existing.required_weight, weight, demand.level
                        );
                        existing.required_weight = weight;
                    }
                }
                None => {
                    index.insert(demand.account_id.as_str(), requirements.len());
                    requirements.push(AuthorizationRequirement {
                        account_id: demand.account_id.clone(),
                        threshold: demand.level,
                        required_weight: weight,
                        signers: snapshot.signers.clone(),
                    });
                }
            }

            (requirements, index)
        },
    );

    requirements
}

/// Requirements for the accounts that resolved, and failures for the rest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub requirements: Vec<AuthorizationRequirement>,
    pub fetch_failures: Vec<AccountFetchFailure>,
}

/// Fetch every demanded account and build its requirement
pub async fn resolve_demands<P>(
    provider: &P,
    demands: &[AccountDemand],
    concurrency: usize,
) -> Resolution
where
    P: AccountDataProvider + ?Sized,
{
    let account_ids = distinct_accounts(demands);
    let snapshots = fetch_accounts(provider, &account_ids, concurrency).await;

    Resolution {
        requirements: build_requirements(demands, &snapshots),
        fetch_failures: snapshots.failures().to_vec(),
    }
}

/// Resolve all authorization requirements of a transaction
pub async fn resolve<P>(
    provider: &P,
    tx: &Transaction,
    concurrency: usize,
) -> Result<Resolution, AnalysisError>
where
    P: AccountDataProvider + ?Sized,
{
    let demands = transaction_demands(tx)?;
    Ok(resolve_demands(provider, &demands, concurrency).await)
}
