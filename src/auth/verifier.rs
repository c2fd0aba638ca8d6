//! Ed25519 signature verification against strkey-encoded public keys

use crate::errors::VerifyError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Length of an ed25519 signature
pub const SIGNATURE_LENGTH: usize = 64;

/// Decode a G... strkey into a verifying key
pub fn parse_public_key(public_key: &str) -> Result<VerifyingKey, VerifyError> {
    let key = stellar_strkey::ed25519::PublicKey::from_string(public_key)
        .map_err(|e| VerifyError::MalformedKey(format!("{}: {:?}", public_key, e)))?;
    VerifyingKey::from_bytes(&key.0)
        .map_err(|e| VerifyError::MalformedKey(format!("{}: {}", public_key, e)))
}

pub fn parse_signature(signature: &[u8]) -> Result<Signature, VerifyError> {
    let bytes: &[u8; SIGNATURE_LENGTH] =
        signature
            .try_into()
            .map_err(|_| VerifyError::MalformedSignature {
                length: signature.len(),
            })?;
    Ok(Signature::from_bytes(bytes))
}

/// Check an already-decoded signature
pub fn verify_parsed(key: &VerifyingKey, message: &[u8], signature: &Signature) -> bool {
    key.verify(message, signature).is_ok()
}

/// Whether `signature` is a valid signature of `message` by `public_key`
pub fn verify(public_key: &str, message: &[u8], signature: &[u8]) -> Result<bool, VerifyError> {
    let key = parse_public_key(public_key)?;
    let signature = parse_signature(signature)?;
    Ok(verify_parsed(&key, message, &signature))
}
