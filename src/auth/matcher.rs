//! Signature attribution
//!
//! Each envelope signature is checked against the candidate signer pool in
//! order and attributed to the first ed25519 signer whose key verifies it.
//! Signatures are independent of each other, so they are checked in
//! parallel; the result keeps envelope order.

use super::verifier::{parse_public_key, parse_signature, verify_parsed};
use crate::types::{
    AuthorizationRequirement, DecoratedSignature, SignatureAttribution, SignatureResult, Signer,
};
use ed25519_dalek::VerifyingKey;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// All signers of all requirements, in requirement order, one entry per key.
///
/// When several accounts list the same key the first occurrence is kept;
/// each account still applies its own weight for that key when evaluated.
pub fn candidate_signers(requirements: &[AuthorizationRequirement]) -> Vec<Signer> {
    let mut seen = HashSet::new();
    requirements
        .iter()
        .flat_map(|req| req.signers.iter())
        .filter(|signer| seen.insert(signer.key.as_str()))
        .cloned()
        .collect()
}

/// Candidate whose key has been decoded once up front
struct PreparedCandidate<'a> {
    signer: &'a Signer,
    key: VerifyingKey,
}

fn prepare(candidates: &[Signer]) -> Vec<PreparedCandidate<'_>> {
    candidates
        .iter()
        .filter(|signer| signer.signer_type.is_verifiable())
        .filter_map(|signer| match parse_public_key(&signer.key) {
            Ok(key) => Some(PreparedCandidate { signer, key }),
            Err(e) => {
                debug!("Skipping signer {}: {}", signer.key, e);
                None
            }
        })
        .collect()
}

/// Attribute every signature to the first candidate that verifies it.
///
/// A signature that is not 64 bytes long, or that no candidate verifies, is
/// left unattributed as [`SignatureResult::Unverified`]. When the pool only
/// holds signer kinds that are not checked (pre-auth, hash-x, signed
/// payload) the signature is [`SignatureResult::Unsupported`] instead.
pub fn match_signatures(
    payload: &[u8; 32],
    signatures: &[DecoratedSignature],
    candidates: &[Signer],
) -> Vec<SignatureAttribution> {
    let prepared = prepare(candidates);
    let no_match = if prepared.is_empty() && !candidates.is_empty() {
        SignatureResult::Unsupported
    } else {
        SignatureResult::Unverified
    };

    signatures
        .par_iter()
        .enumerate()
        .map(|(index, decorated)| {
            let signature = match parse_signature(&decorated.signature) {
                Ok(signature) => signature,
                Err(e) => {
                    debug!("Signature {} is malformed: {}", index, e);
                    return SignatureAttribution::unattributed(
                        index,
                        decorated,
                        SignatureResult::Unverified,
                    );
                }
            };

            prepared
                .iter()
                .find(|candidate| verify_parsed(&candidate.key, payload, &signature))
                .map(|candidate| {
                    SignatureAttribution::attributed(index, decorated, candidate.signer.clone())
                })
                .unwrap_or_else(|| SignatureAttribution::unattributed(index, decorated, no_match))
        })
        .collect()
}
