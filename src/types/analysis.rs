use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DecoratedSignature, Signer, Transaction};
use crate::errors::FetchError;
use crate::utils::encoding::{base64_bytes, hex_array};

/// Authorization tier an operation type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ThresholdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThresholdLevel::Low => "low",
            ThresholdLevel::Medium => "medium",
            ThresholdLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// Cumulative signature weight one account must contribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequirement {
    pub account_id: String,
    /// Highest tier any operation demanded of this account
    pub threshold: ThresholdLevel,
    pub required_weight: u32,
    pub signers: Vec<Signer>,
}

impl AuthorizationRequirement {
    /// Weight this account grants to `key`, if the key is one of its signers
    pub fn signer_weight(&self, key: &str) -> Option<u8> {
        self.signers
            .iter()
            .find(|signer| signer.key == key)
            .map(|signer| signer.weight)
    }
}

/// Outcome of checking one envelope signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureResult {
    /// Verified against a candidate signer's key
    Verified,
    /// Checked (or unparseable) and matched no candidate
    Unverified,
    /// Only pre-auth, hash-x or signed-payload candidates existed, which are not checked
    Unsupported,
}

impl fmt::Display for SignatureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignatureResult::Verified => "Verified",
            SignatureResult::Unverified => "Unverified",
            SignatureResult::Unsupported => "Unsupported",
        };
        f.write_str(label)
    }
}

/// Which signer, if any, produced an envelope signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureAttribution {
    /// Position of the signature on the envelope
    pub index: usize,
    #[serde(with = "hex_array")]
    pub hint: [u8; 4],
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributing_signer: Option<Signer>,
    pub result: SignatureResult,
}

impl SignatureAttribution {
    pub fn attributed(index: usize, signature: &DecoratedSignature, signer: Signer) -> Self {
        Self {
            index,
            hint: signature.hint,
            signature: signature.signature.clone(),
            contributing_signer: Some(signer),
            result: SignatureResult::Verified,
        }
    }

    pub fn unattributed(index: usize, signature: &DecoratedSignature, result: SignatureResult) -> Self {
        Self {
            index,
            hint: signature.hint,
            signature: signature.signature.clone(),
            contributing_signer: None,
            result,
        }
    }

    pub fn verified(&self) -> bool {
        self.result == SignatureResult::Verified
    }

    pub fn signer_key(&self) -> Option<&str> {
        self.contributing_signer.as_ref().map(|s| s.key.as_str())
    }
}

/// Whether an account's requirement is satisfied by the envelope's signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationOutcome {
    pub account_id: String,
    pub required_weight: u32,
    pub contributed_weight: u32,
    pub met: bool,
    pub contributing_signatures: Vec<SignatureAttribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureKind {
    NotFound,
    Network,
}

/// An account whose requirement could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFetchFailure {
    pub account_id: String,
    pub kind: FetchFailureKind,
    pub message: String,
}

impl AccountFetchFailure {
    pub fn from_error(account_id: impl Into<String>, error: &FetchError) -> Self {
        let kind = if error.is_not_found() {
            FetchFailureKind::NotFound
        } else {
            FetchFailureKind::Network
        };
        Self {
            account_id: account_id.into(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Requirements, attributions and outcomes for one signed payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationReport {
    pub requirements: Vec<AuthorizationRequirement>,
    pub attributions: Vec<SignatureAttribution>,
    pub outcomes: Vec<AuthorizationOutcome>,
    pub fetch_failures: Vec<AccountFetchFailure>,
}

impl AuthorizationReport {
    pub fn requirement_for(&self, account_id: &str) -> Option<&AuthorizationRequirement> {
        self.requirements
            .iter()
            .find(|req| req.account_id == account_id)
    }

    pub fn outcome_for(&self, account_id: &str) -> Option<&AuthorizationOutcome> {
        self.outcomes.iter().find(|o| o.account_id == account_id)
    }

    /// True when every resolved account is met and nothing failed to resolve
    pub fn fully_authorized(&self) -> bool {
        self.fetch_failures.is_empty()
            && !self.outcomes.is_empty()
            && self.outcomes.iter().all(|o| o.met)
    }

    /// Signatures that matched no signer
    pub fn unattributed(&self) -> impl Iterator<Item = &SignatureAttribution> {
        self.attributions.iter().filter(|a| !a.verified())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    Plain,
    FeeBump,
}

/// The fee-bump source's own authorization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBumpReport {
    pub fee_source: String,
    pub fee: i64,
    #[serde(with = "hex_array")]
    pub signing_payload: [u8; 32],
    pub authorization: AuthorizationReport,
}

/// Everything one `analyze` call produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub kind: EnvelopeKind,
    /// The transaction whose operations are authorized (the inner one for fee-bumps)
    pub transaction: Transaction,
    pub authorization: AuthorizationReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_bump: Option<FeeBumpReport>,
}

impl AnalysisResult {
    /// True when the transaction and, if present, the fee-bump wrapper are fully authorized
    pub fn fully_authorized(&self) -> bool {
        self.authorization.fully_authorized()
            && self
                .fee_bump
                .as_ref()
                .map_or(true, |fb| fb.authorization.fully_authorized())
    }
}
