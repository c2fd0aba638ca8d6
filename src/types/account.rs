use serde::{Deserialize, Serialize};

use super::ThresholdLevel;

/// Kind of key a signer entry holds, using Horizon's wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignerType {
    #[serde(rename = "ed25519_public_key")]
    Ed25519,
    #[serde(rename = "preauth_tx")]
    PreAuthTx,
    #[serde(rename = "sha256_hash")]
    HashX,
    #[serde(rename = "ed25519_signed_payload")]
    Ed25519SignedPayload,
}

impl SignerType {
    /// Only plain ed25519 keys can be checked against an envelope signature directly
    pub fn is_verifiable(&self) -> bool {
        matches!(self, SignerType::Ed25519)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignerType::Ed25519 => "ed25519",
            SignerType::PreAuthTx => "preAuthTx",
            SignerType::HashX => "hashX",
            SignerType::Ed25519SignedPayload => "ed25519SignedPayload",
        }
    }
}

/// One signer entry on an account, as returned by the account data provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    /// Strkey-encoded key (G... for ed25519, T... pre-auth, X... hash-x, P... signed payload)
    pub key: String,
    #[serde(rename = "type")]
    pub signer_type: SignerType,
    pub weight: u8,
}

impl Signer {
    pub fn ed25519(key: impl Into<String>, weight: u8) -> Self {
        Self {
            key: key.into(),
            signer_type: SignerType::Ed25519,
            weight,
        }
    }
}

/// Minimum cumulative weight for each threshold tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountThresholds {
    #[serde(rename = "low_threshold")]
    pub low: u8,
    #[serde(rename = "med_threshold")]
    pub medium: u8,
    #[serde(rename = "high_threshold")]
    pub high: u8,
}

impl AccountThresholds {
    pub fn new(low: u8, medium: u8, high: u8) -> Self {
        Self { low, medium, high }
    }

    /// Weight required for an operation in the given tier
    pub fn for_level(&self, level: ThresholdLevel) -> u8 {
        match level {
            ThresholdLevel::Low => self.low,
            ThresholdLevel::Medium => self.medium,
            ThresholdLevel::High => self.high,
        }
    }
}

/// Balance line shown by the account view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

impl Balance {
    /// Human-readable asset label ("XLM" for the native asset)
    pub fn asset_label(&self) -> String {
        match (&self.asset_code, &self.asset_issuer) {
            (Some(code), Some(issuer)) => format!("{}:{}", code, issuer),
            (Some(code), None) => code.clone(),
            _ if self.asset_type == "native" => "XLM".to_string(),
            _ => self.asset_type.clone(),
        }
    }
}

/// Snapshot of an account taken at analysis time.
///
/// Field names follow Horizon's `/accounts/{id}` response so that saved
/// Horizon records can be loaded verbatim as offline snapshots; unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    pub thresholds: AccountThresholds,
    pub signers: Vec<Signer>,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl AccountSnapshot {
    pub fn new(
        account_id: impl Into<String>,
        thresholds: AccountThresholds,
        signers: Vec<Signer>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            sequence: None,
            thresholds,
            signers,
            balances: Vec::new(),
        }
    }
}
