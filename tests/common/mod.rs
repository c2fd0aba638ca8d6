//! Common Test Utilities
//!
//! Keypairs, XDR envelope builders and account data providers shared by the
//! unit and integration suites. Envelopes are built and signed with the same
//! stellar-xdr types the parser decodes, so every test exercises real wire
//! bytes.

#![allow(dead_code)]

pub mod providers;

use ed25519_dalek::SigningKey;
use stellar_txn_inspector::types::{AccountSnapshot, AccountThresholds, Signer};

/// Deterministic test keypair with its G... account id
pub struct TestKey {
    pub signing: SigningKey,
    pub account_id: String,
}

impl TestKey {
    pub fn public_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// Ed25519 signer entry for this key
    pub fn signer(&self, weight: u8) -> Signer {
        Signer::ed25519(self.account_id.clone(), weight)
    }
}

pub fn keypair(seed: u8) -> TestKey {
    let signing = SigningKey::from_bytes(&[seed; 32]);
    let account_id =
        stellar_strkey::ed25519::PublicKey(signing.verifying_key().to_bytes()).to_string();
    TestKey {
        signing,
        account_id,
    }
}

/// Account snapshot whose thresholds and signers are given explicitly
pub fn account(
    key: &TestKey,
    thresholds: (u8, u8, u8),
    signers: Vec<Signer>,
) -> AccountSnapshot {
    AccountSnapshot::new(
        key.account_id.clone(),
        AccountThresholds::new(thresholds.0, thresholds.1, thresholds.2),
        signers,
    )
}

/// Single-signer account where the master key has weight 1
pub fn single_signer_account(key: &TestKey) -> AccountSnapshot {
    account(key, (1, 1, 1), vec![key.signer(1)])
}
