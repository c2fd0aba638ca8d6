use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::encoding::{base64_bytes, hex_array};

/// Every operation type the ledger protocol defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationType {
    CreateAccount,
    Payment,
    PathPaymentStrictReceive,
    ManageSellOffer,
    CreatePassiveSellOffer,
    SetOptions,
    ChangeTrust,
    AllowTrust,
    AccountMerge,
    Inflation,
    ManageData,
    BumpSequence,
    ManageBuyOffer,
    PathPaymentStrictSend,
    CreateClaimableBalance,
    ClaimClaimableBalance,
    BeginSponsoringFutureReserves,
    EndSponsoringFutureReserves,
    RevokeSponsorship,
    Clawback,
    ClawbackClaimableBalance,
    SetTrustLineFlags,
    LiquidityPoolDeposit,
    LiquidityPoolWithdraw,
    InvokeHostFunction,
    ExtendFootprintTtl,
    RestoreFootprint,
}

impl OperationType {
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::CreateAccount => "createAccount",
            OperationType::Payment => "payment",
            OperationType::PathPaymentStrictReceive => "pathPaymentStrictReceive",
            OperationType::ManageSellOffer => "manageSellOffer",
            OperationType::CreatePassiveSellOffer => "createPassiveSellOffer",
            OperationType::SetOptions => "setOptions",
            OperationType::ChangeTrust => "changeTrust",
            OperationType::AllowTrust => "allowTrust",
            OperationType::AccountMerge => "accountMerge",
            OperationType::Inflation => "inflation",
            OperationType::ManageData => "manageData",
            OperationType::BumpSequence => "bumpSequence",
            OperationType::ManageBuyOffer => "manageBuyOffer",
            OperationType::PathPaymentStrictSend => "pathPaymentStrictSend",
            OperationType::CreateClaimableBalance => "createClaimableBalance",
            OperationType::ClaimClaimableBalance => "claimClaimableBalance",
            OperationType::BeginSponsoringFutureReserves => "beginSponsoringFutureReserves",
            OperationType::EndSponsoringFutureReserves => "endSponsoringFutureReserves",
            OperationType::RevokeSponsorship => "revokeSponsorship",
            OperationType::Clawback => "clawback",
            OperationType::ClawbackClaimableBalance => "clawbackClaimableBalance",
            OperationType::SetTrustLineFlags => "setTrustLineFlags",
            OperationType::LiquidityPoolDeposit => "liquidityPoolDeposit",
            OperationType::LiquidityPoolWithdraw => "liquidityPoolWithdraw",
            OperationType::InvokeHostFunction => "invokeHostFunction",
            OperationType::ExtendFootprintTtl => "extendFootprintTtl",
            OperationType::RestoreFootprint => "restoreFootprint",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named field of an operation body, such as its destination or amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationField {
    pub name: String,
    pub value: String,
}

impl OperationField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A decoded operation: its type, explicit source and displayable fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_type: OperationType,
    /// Explicit source account (G... strkey), if the operation overrides the transaction source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Body fields in display order; empty for types without a detailed rendering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<OperationField>,
}

impl Operation {
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            source: None,
            details: Vec::new(),
        }
    }

    pub fn with_source(operation_type: OperationType, source: impl Into<String>) -> Self {
        Self {
            operation_type,
            source: Some(source.into()),
            details: Vec::new(),
        }
    }

    /// Account whose authorization this operation consumes
    pub fn effective_source<'a>(&'a self, transaction_source: &'a str) -> &'a str {
        self.source.as_deref().unwrap_or(transaction_source)
    }

    pub fn detail(&self, name: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    /// Zero means no upper bound
    pub max_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Memo {
    None,
    Text(String),
    Id(u64),
    Hash(String),
    Return(String),
}

/// A signature attached to an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    /// Last four bytes of the signing key, as set by the signer
    #[serde(with = "hex_array")]
    pub hint: [u8; 4],
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

/// A parsed transaction with the data needed to verify its signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction source account (G... strkey, muxed accounts reduced to their base account)
    pub source: String,
    pub fee: u32,
    pub sequence: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
    pub signatures: Vec<DecoratedSignature>,
    /// Network-bound transaction hash; this is what signers sign
    #[serde(with = "hex_array")]
    pub signing_payload: [u8; 32],
}

impl Transaction {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.signing_payload)
    }
}

/// Fee-bump wrapper around an inner transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBumpEnvelope {
    pub fee_source: String,
    pub fee: i64,
    pub signatures: Vec<DecoratedSignature>,
    #[serde(with = "hex_array")]
    pub signing_payload: [u8; 32],
    pub inner: Transaction,
}

/// A decoded envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Plain(Transaction),
    FeeBump(FeeBumpEnvelope),
}

impl Envelope {
    /// The transaction whose operations are being authorized
    pub fn transaction(&self) -> &Transaction {
        match self {
            Envelope::Plain(tx) => tx,
            Envelope::FeeBump(fee_bump) => &fee_bump.inner,
        }
    }
}
