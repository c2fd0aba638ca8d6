//! Envelope parsing
//!
//! Decodes base64 `TransactionEnvelope` XDR into the domain model used by the
//! authorization engine:
//! - **convert** - XDR structures to [`Transaction`] / [`FeeBumpEnvelope`]
//! - **payload** - network-bound signing payloads (transaction hashes)
//!
//! The parser exposes the fee-bump and plain decodings separately; choosing
//! between them is the coordinator's job.

pub mod convert;
pub mod payload;

use crate::errors::EnvelopeError;
use crate::types::{FeeBumpEnvelope, Transaction};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use stellar_xdr::curr::{Limits, ReadXdr, TransactionEnvelope};
use tracing::debug;

pub use payload::network_id;

/// Passphrase of the public test network
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Passphrase of the production network
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// XDR nesting depth accepted when decoding, same as the network's own limit
pub const MAX_XDR_DEPTH: u32 = 500;

/// Resolve a network preset name to its passphrase; anything else is taken verbatim
pub fn resolve_network_passphrase(network: &str) -> String {
    match network.to_ascii_lowercase().as_str() {
        "testnet" | "test" => TESTNET_PASSPHRASE.to_string(),
        "public" | "mainnet" | "pubnet" => PUBLIC_PASSPHRASE.to_string(),
        _ => network.to_string(),
    }
}

/// Decodes envelopes for one network
#[derive(Debug, Clone)]
pub struct XdrEnvelopeParser {
    network_passphrase: String,
    network_id: [u8; 32],
}

impl XdrEnvelopeParser {
    pub fn new(network_passphrase: impl Into<String>) -> Self {
        let network_passphrase = network_passphrase.into();
        let network_id = network_id(&network_passphrase);
        Self {
            network_passphrase,
            network_id,
        }
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    /// Decode an envelope that must be a fee-bump
    pub fn parse_fee_bump(&self, raw_base64: &str) -> Result<FeeBumpEnvelope, EnvelopeError> {
        match self.decode(raw_base64)? {
            TransactionEnvelope::TxFeeBump(envelope) => {
                convert::fee_bump_envelope(&envelope, &self.network_id)
            }
            _ => Err(EnvelopeError::NotFeeBump),
        }
    }

    /// Decode an envelope that must be a plain (v0 or v1) transaction
    pub fn parse_transaction(&self, raw_base64: &str) -> Result<Transaction, EnvelopeError> {
        match self.decode(raw_base64)? {
            TransactionEnvelope::TxV0(envelope) => {
                convert::v0_envelope(&envelope, &self.network_id)
            }
            TransactionEnvelope::Tx(envelope) => convert::v1_envelope(&envelope, &self.network_id),
            TransactionEnvelope::TxFeeBump(_) => Err(EnvelopeError::UnexpectedFeeBump),
        }
    }

    fn decode(&self, raw_base64: &str) -> Result<TransactionEnvelope, EnvelopeError> {
        // Pasted envelopes frequently carry line breaks
        let compact: String = raw_base64.split_whitespace().collect();
        let bytes = STANDARD.decode(compact.as_bytes())?;
        debug!("Decoding {} byte envelope", bytes.len());
        // Nested contract values would otherwise recurse without bound
        let limits = Limits {
            depth: MAX_XDR_DEPTH,
            len: bytes.len(),
        };
        Ok(TransactionEnvelope::from_xdr(bytes, limits)?)
    }
}
