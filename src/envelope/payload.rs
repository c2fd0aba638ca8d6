//! Signing payloads
//!
//! Signers sign `sha256(network_id || envelope_type || transaction_xdr)`, where
//! `network_id = sha256(passphrase)`. Legacy v0 transactions are hashed as
//! their v1 equivalent.

use crate::errors::EnvelopeError;
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    FeeBumpTransaction, Hash, Limits, MuxedAccount, Preconditions, Transaction, TransactionExt,
    TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction, TransactionV0,
    WriteXdr,
};

/// Hash of a network passphrase
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Signing payload of a v1 transaction
pub fn transaction_payload(
    tx: &Transaction,
    network_id: &[u8; 32],
) -> Result<[u8; 32], EnvelopeError> {
    hash_tagged(
        TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
        network_id,
    )
}

/// Signing payload of a fee-bump wrapper (covers the inner envelope too)
pub fn fee_bump_payload(
    tx: &FeeBumpTransaction,
    network_id: &[u8; 32],
) -> Result<[u8; 32], EnvelopeError> {
    hash_tagged(
        TransactionSignaturePayloadTaggedTransaction::TxFeeBump(tx.clone()),
        network_id,
    )
}

/// The v1 transaction a v0 transaction is signed as
pub fn v0_as_v1(tx: &TransactionV0) -> Transaction {
    Transaction {
        source_account: MuxedAccount::Ed25519(tx.source_account_ed25519.clone()),
        fee: tx.fee,
        seq_num: tx.seq_num.clone(),
        cond: match &tx.time_bounds {
            Some(bounds) => Preconditions::Time(bounds.clone()),
            None => Preconditions::None,
        },
        memo: tx.memo.clone(),
        operations: tx.operations.clone(),
        ext: TransactionExt::V0,
    }
}

fn hash_tagged(
    tagged_transaction: TransactionSignaturePayloadTaggedTransaction,
    network_id: &[u8; 32],
) -> Result<[u8; 32], EnvelopeError> {
    let payload = TransactionSignaturePayload {
        network_id: Hash(*network_id),
        tagged_transaction,
    };
    let bytes = payload.to_xdr(Limits::none())?;
    Ok(Sha256::digest(&bytes).into())
}
