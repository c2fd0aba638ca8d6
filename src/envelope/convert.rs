//! XDR to domain conversion

use super::payload::{fee_bump_payload, transaction_payload, v0_as_v1};
use crate::errors::EnvelopeError;
use crate::types::{
    DecoratedSignature, FeeBumpEnvelope, Memo, Operation, OperationField, OperationType,
    TimeBounds, Transaction,
};
use stellar_xdr::curr as xdr;

/// Strkey (G...) of the ed25519 account behind a possibly-muxed account.
///
/// The multiplexing id only tags a payment destination; authorization is
/// always against the base account.
pub fn muxed_account_id(account: &xdr::MuxedAccount) -> String {
    let key = match account {
        xdr::MuxedAccount::Ed25519(key) => key.0,
        xdr::MuxedAccount::MuxedEd25519(muxed) => muxed.ed25519.0,
    };
    account_id_from_bytes(key)
}

pub fn account_id_from_bytes(key: [u8; 32]) -> String {
    stellar_strkey::ed25519::PublicKey(key).to_string()
}

/// Raw ed25519 key bytes of a G... strkey
pub fn account_id_to_bytes(account_id: &str) -> Result<[u8; 32], EnvelopeError> {
    stellar_strkey::ed25519::PublicKey::from_string(account_id)
        .map(|key| key.0)
        .map_err(|e| EnvelopeError::InvalidAccountId(format!("{}: {:?}", account_id, e)))
}

pub fn operation_type(body: &xdr::OperationBody) -> OperationType {
    use xdr::OperationBody as Body;

    match body {
        Body::CreateAccount(_) => OperationType::CreateAccount,
        Body::Payment(_) => OperationType::Payment,
        Body::PathPaymentStrictReceive(_) => OperationType::PathPaymentStrictReceive,
        Body::ManageSellOffer(_) => OperationType::ManageSellOffer,
        Body::CreatePassiveSellOffer(_) => OperationType::CreatePassiveSellOffer,
        Body::SetOptions(_) => OperationType::SetOptions,
        Body::ChangeTrust(_) => OperationType::ChangeTrust,
        Body::AllowTrust(_) => OperationType::AllowTrust,
        Body::AccountMerge(_) => OperationType::AccountMerge,
        Body::Inflation => OperationType::Inflation,
        Body::ManageData(_) => OperationType::ManageData,
        Body::BumpSequence(_) => OperationType::BumpSequence,
        Body::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
        Body::PathPaymentStrictSend(_) => OperationType::PathPaymentStrictSend,
        Body::CreateClaimableBalance(_) => OperationType::CreateClaimableBalance,
        Body::ClaimClaimableBalance(_) => OperationType::ClaimClaimableBalance,
        Body::BeginSponsoringFutureReserves(_) => OperationType::BeginSponsoringFutureReserves,
        Body::EndSponsoringFutureReserves => OperationType::EndSponsoringFutureReserves,
        Body::RevokeSponsorship(_) => OperationType::RevokeSponsorship,
        Body::Clawback(_) => OperationType::Clawback,
        Body::ClawbackClaimableBalance(_) => OperationType::ClawbackClaimableBalance,
        Body::SetTrustLineFlags(_) => OperationType::SetTrustLineFlags,
        Body::LiquidityPoolDeposit(_) => OperationType::LiquidityPoolDeposit,
        Body::LiquidityPoolWithdraw(_) => OperationType::LiquidityPoolWithdraw,
        Body::InvokeHostFunction(_) => OperationType::InvokeHostFunction,
        Body::ExtendFootprintTtl(_) => OperationType::ExtendFootprintTtl,
        Body::RestoreFootprint(_) => OperationType::RestoreFootprint,
    }
}

fn operation(op: &xdr::Operation) -> Operation {
    Operation {
        operation_type: operation_type(&op.body),
        source: op.source_account.as_ref().map(muxed_account_id),
        details: operation_details(&op.body),
    }
}

fn account_id(account: &xdr::AccountId) -> String {
    let xdr::PublicKey::PublicKeyTypeEd25519(key) = &account.0;
    account_id_from_bytes(key.0)
}

/// Stroops as a decimal lumen/asset amount (7 fractional digits)
pub fn format_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = stroops.unsigned_abs();
    format!("{}{}.{:07}", sign, abs / 10_000_000, abs % 10_000_000)
}

fn asset_code(code: &[u8]) -> String {
    let end = code.iter().position(|b| *b == 0).unwrap_or(code.len());
    String::from_utf8_lossy(&code[..end]).into_owned()
}

/// `XLM` for the native asset, `CODE:ISSUER` otherwise
pub fn format_asset(asset: &xdr::Asset) -> String {
    match asset {
        xdr::Asset::Native => "XLM".to_string(),
        xdr::Asset::CreditAlphanum4(a) => {
            format!("{}:{}", asset_code(&a.asset_code.0), account_id(&a.issuer))
        }
        xdr::Asset::CreditAlphanum12(a) => {
            format!("{}:{}", asset_code(&a.asset_code.0), account_id(&a.issuer))
        }
    }
}

fn trust_line_asset(line: &xdr::ChangeTrustAsset) -> String {
    match line {
        xdr::ChangeTrustAsset::Native => "XLM".to_string(),
        xdr::ChangeTrustAsset::CreditAlphanum4(a) => {
            format!("{}:{}", asset_code(&a.asset_code.0), account_id(&a.issuer))
        }
        xdr::ChangeTrustAsset::CreditAlphanum12(a) => {
            format!("{}:{}", asset_code(&a.asset_code.0), account_id(&a.issuer))
        }
        xdr::ChangeTrustAsset::PoolShare(_) => "liquidity pool shares".to_string(),
    }
}

fn signer_key(key: &xdr::SignerKey) -> String {
    match key {
        xdr::SignerKey::Ed25519(key) => account_id_from_bytes(key.0),
        xdr::SignerKey::PreAuthTx(hash) => stellar_strkey::PreAuthTx(hash.0).to_string(),
        xdr::SignerKey::HashX(hash) => stellar_strkey::HashX(hash.0).to_string(),
        xdr::SignerKey::Ed25519SignedPayload(signed) => format!(
            "signed payload of {}",
            account_id_from_bytes(signed.ed25519.0)
        ),
    }
}

/// Body fields shown for an operation; types without a detailed view get none
pub fn operation_details(body: &xdr::OperationBody) -> Vec<OperationField> {
    use xdr::OperationBody as Body;

    let mut fields = Vec::new();
    let mut push = |name: &str, value: String| fields.push(OperationField::new(name, value));

    match body {
        Body::CreateAccount(op) => {
            push("destination", account_id(&op.destination));
            push("starting_balance", format_amount(op.starting_balance));
        }
        Body::Payment(op) => {
            push("destination", muxed_account_id(&op.destination));
            push("asset", format_asset(&op.asset));
            push("amount", format_amount(op.amount));
        }
        Body::PathPaymentStrictReceive(op) => {
            push("destination", muxed_account_id(&op.destination));
            push("send_asset", format_asset(&op.send_asset));
            push("send_max", format_amount(op.send_max));
            push("dest_asset", format_asset(&op.dest_asset));
            push("dest_amount", format_amount(op.dest_amount));
        }
        Body::PathPaymentStrictSend(op) => {
            push("destination", muxed_account_id(&op.destination));
            push("send_asset", format_asset(&op.send_asset));
            push("send_amount", format_amount(op.send_amount));
            push("dest_asset", format_asset(&op.dest_asset));
            push("dest_min", format_amount(op.dest_min));
        }
        Body::SetOptions(op) => {
            if let Some(dest) = &op.inflation_dest {
                push("inflation_dest", account_id(dest));
            }
            if let Some(flags) = op.clear_flags {
                push("clear_flags", flags.to_string());
            }
            if let Some(flags) = op.set_flags {
                push("set_flags", flags.to_string());
            }
            if let Some(weight) = op.master_weight {
                push("master_weight", weight.to_string());
            }
            if let Some(threshold) = op.low_threshold {
                push("low_threshold", threshold.to_string());
            }
            if let Some(threshold) = op.med_threshold {
                push("med_threshold", threshold.to_string());
            }
            if let Some(threshold) = op.high_threshold {
                push("high_threshold", threshold.to_string());
            }
            if let Some(domain) = &op.home_domain {
                push(
                    "home_domain",
                    String::from_utf8_lossy(domain.as_slice()).into_owned(),
                );
            }
            if let Some(signer) = &op.signer {
                push(
                    "signer",
                    format!("{} (weight {})", signer_key(&signer.key), signer.weight),
                );
            }
        }
        Body::ChangeTrust(op) => {
            push("asset", trust_line_asset(&op.line));
            push("limit", format_amount(op.limit));
        }
        Body::AllowTrust(op) => {
            push("trustor", account_id(&op.trustor));
            let code = match &op.asset {
                xdr::AssetCode::CreditAlphanum4(code) => asset_code(&code.0),
                xdr::AssetCode::CreditAlphanum12(code) => asset_code(&code.0),
            };
            push("asset_code", code);
            push("authorize", op.authorize.to_string());
        }
        Body::AccountMerge(destination) => {
            push("destination", muxed_account_id(destination));
        }
        Body::ManageData(op) => {
            push(
                "name",
                String::from_utf8_lossy(op.data_name.as_slice()).into_owned(),
            );
            match &op.data_value {
                Some(value) => push("value", hex::encode(value.0.as_slice())),
                None => push("value", "removed".to_string()),
            }
        }
        Body::BumpSequence(op) => {
            push("bump_to", op.bump_to.0.to_string());
        }
        _ => {}
    }

    fields
}

fn memo(memo: &xdr::Memo) -> Memo {
    match memo {
        xdr::Memo::None => Memo::None,
        xdr::Memo::Text(text) => Memo::Text(String::from_utf8_lossy(text.as_slice()).into_owned()),
        xdr::Memo::Id(id) => Memo::Id(*id),
        xdr::Memo::Hash(hash) => Memo::Hash(hex::encode(hash.0)),
        xdr::Memo::Return(hash) => Memo::Return(hex::encode(hash.0)),
    }
}

fn time_bounds(bounds: &xdr::TimeBounds) -> TimeBounds {
    TimeBounds {
        min_time: bounds.min_time.0,
        max_time: bounds.max_time.0,
    }
}

fn preconditions_time_bounds(cond: &xdr::Preconditions) -> Option<TimeBounds> {
    match cond {
        xdr::Preconditions::None => None,
        xdr::Preconditions::Time(bounds) => Some(time_bounds(bounds)),
        xdr::Preconditions::V2(v2) => v2.time_bounds.as_ref().map(time_bounds),
    }
}

fn signatures(signatures: &[xdr::DecoratedSignature]) -> Vec<DecoratedSignature> {
    signatures
        .iter()
        .map(|sig| DecoratedSignature {
            hint: sig.hint.0,
            signature: sig.signature.0.to_vec(),
        })
        .collect()
}

fn transaction(
    tx: &xdr::Transaction,
    attached: &[xdr::DecoratedSignature],
    network_id: &[u8; 32],
) -> Result<Transaction, EnvelopeError> {
    Ok(Transaction {
        source: muxed_account_id(&tx.source_account),
        fee: tx.fee,
        sequence: tx.seq_num.0,
        time_bounds: preconditions_time_bounds(&tx.cond),
        memo: memo(&tx.memo),
        operations: tx.operations.iter().map(operation).collect(),
        signatures: signatures(attached),
        signing_payload: transaction_payload(tx, network_id)?,
    })
}

pub fn v1_envelope(
    envelope: &xdr::TransactionV1Envelope,
    network_id: &[u8; 32],
) -> Result<Transaction, EnvelopeError> {
    transaction(&envelope.tx, &envelope.signatures, network_id)
}

pub fn v0_envelope(
    envelope: &xdr::TransactionV0Envelope,
    network_id: &[u8; 32],
) -> Result<Transaction, EnvelopeError> {
    transaction(&v0_as_v1(&envelope.tx), &envelope.signatures, network_id)
}

pub fn fee_bump_envelope(
    envelope: &xdr::FeeBumpTransactionEnvelope,
    network_id: &[u8; 32],
) -> Result<FeeBumpEnvelope, EnvelopeError> {
    let inner = match &envelope.tx.inner_tx {
        xdr::FeeBumpTransactionInnerTx::Tx(inner) => v1_envelope(inner, network_id)?,
    };

    Ok(FeeBumpEnvelope {
        fee_source: muxed_account_id(&envelope.tx.fee_source),
        fee: envelope.tx.fee,
        signatures: signatures(&envelope.signatures),
        signing_payload: fee_bump_payload(&envelope.tx, network_id)?,
        inner,
    })
}
