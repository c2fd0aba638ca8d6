use crate::types::{AuthorizationOutcome, AuthorizationRequirement, SignatureAttribution};
use std::collections::HashSet;

/// Sum the weight this account grants to the signers that signed.
///
/// An attribution counts when its signer key is one of the account's
/// signers, weighted by the account's own entry for that key. Each distinct
/// key counts once no matter how many signatures it produced. The
/// requirement is met when the contributed weight reaches the required
/// weight and at least one signature contributed.
pub fn evaluate(
    requirement: &AuthorizationRequirement,
    attributions: &[SignatureAttribution],
) -> AuthorizationOutcome {
    let mut counted = HashSet::new();
    let mut contributed_weight: u32 = 0;
    let mut contributing_signatures = Vec::new();

    for attribution in attributions {
        let Some(key) = attribution.signer_key() else {
            continue;
        };
        let Some(weight) = requirement.signer_weight(key) else {
            continue;
        };

        if counted.insert(key) {
            contributed_weight += u32::from(weight);
        }
        contributing_signatures.push(attribution.clone());
    }

    let remaining = i64::from(requirement.required_weight) - i64::from(contributed_weight);
    let met = remaining <= 0 && !contributing_signatures.is_empty();

    AuthorizationOutcome {
        account_id: requirement.account_id.clone(),
        required_weight: requirement.required_weight,
        contributed_weight,
        met,
        contributing_signatures,
    }
}

/// Evaluate every requirement against the same attributions
pub fn evaluate_all(
    requirements: &[AuthorizationRequirement],
    attributions: &[SignatureAttribution],
) -> Vec<AuthorizationOutcome> {
    requirements
        .iter()
        .map(|req| evaluate(req, attributions))
        .collect()
}
