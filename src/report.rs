//! Console and JSON rendering of analysis results and account snapshots

use crate::errors::AppResult;
use crate::types::{
    AccountSnapshot, AnalysisResult, AuthorizationOutcome, AuthorizationReport,
    AuthorizationRequirement, EnvelopeKind, Memo, SignatureResult, Transaction,
};
use crate::utils::encoding::to_base64;
use crate::utils::time::{format_max_time, format_unix_time};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        }
    }
}

/// Export data as JSON for programmatic use
pub fn export_json<T: Serialize>(data: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn format_analysis(result: &AnalysisResult, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(result),
        OutputFormat::Console => Ok(render_analysis(result)),
    }
}

pub fn format_account(snapshot: &AccountSnapshot, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(snapshot),
        OutputFormat::Console => Ok(render_account(snapshot)),
    }
}

/// Human-readable report of one analysis run
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("=== TRANSACTION ===\n");
    if result.kind == EnvelopeKind::FeeBump {
        output.push_str("Envelope: fee-bump\n");
    }
    render_transaction(&mut output, &result.transaction);

    if let Some(fee_bump) = &result.fee_bump {
        output.push_str("\n=== FEE BUMP ===\n");
        output.push_str(&format!("Fee Source: {}\n", fee_bump.fee_source));
        output.push_str(&format!("Fee: {}\n", fee_bump.fee));
        output.push_str(&format!(
            "Hash: {}\n",
            hex::encode(fee_bump.signing_payload)
        ));
        render_authorization(&mut output, &fee_bump.authorization);
    }

    output.push_str("\n=== AUTHORIZATION ===\n");
    render_authorization(&mut output, &result.authorization);

    output.push_str(&format!(
        "\nFully authorized: {}\n",
        if result.fully_authorized() { "yes" } else { "no" }
    ));
    output
}

fn render_transaction(output: &mut String, tx: &Transaction) {
    output.push_str(&format!("Hash: {}\n", tx.hash_hex()));
    output.push_str(&format!("Source Account: {}\n", tx.source));
    output.push_str(&format!("Sequence Number: {}\n", tx.sequence));
    output.push_str(&format!("Fee: {}\n", tx.fee));

    match &tx.time_bounds {
        Some(bounds) => {
            output.push_str(&format!(
                "Valid After: {}\n",
                format_unix_time(bounds.min_time)
            ));
            output.push_str(&format!(
                "Valid Before: {}\n",
                format_max_time(bounds.max_time)
            ));
        }
        None => output.push_str("Time Bounds: none\n"),
    }

    match &tx.memo {
        Memo::None => {}
        Memo::Text(text) => output.push_str(&format!("Memo (text): {}\n", text)),
        Memo::Id(id) => output.push_str(&format!("Memo (id): {}\n", id)),
        Memo::Hash(hash) => output.push_str(&format!("Memo (hash): {}\n", hash)),
        Memo::Return(hash) => output.push_str(&format!("Memo (return): {}\n", hash)),
    }

    output.push_str(&format!("Operations: {}\n", tx.operations.len()));
    for (index, op) in tx.operations.iter().enumerate() {
        output.push_str(&format!(
            "  [{}] {} (source: {})\n",
            index,
            op.operation_type,
            op.effective_source(&tx.source)
        ));
        for field in &op.details {
            output.push_str(&format!("      {}: {}\n", field.name, field.value));
        }
    }
}

fn render_authorization(output: &mut String, report: &AuthorizationReport) {
    for requirement in &report.requirements {
        render_requirement(
            output,
            requirement,
            report.outcome_for(&requirement.account_id),
        );
    }

    for failure in &report.fetch_failures {
        output.push_str(&format!(
            "\nrequirement for account {} unknown (fetch failed): {}\n",
            failure.account_id, failure.message
        ));
    }

    if !report.attributions.is_empty() {
        output.push_str("\nSignatures:\n");
    }
    for attribution in &report.attributions {
        let line = match (attribution.result, attribution.signer_key()) {
            (SignatureResult::Verified, Some(key)) => {
                format!("  signature {} signed by {}\n", attribution.index, key)
            }
            (SignatureResult::Unsupported, _) => format!(
                "  signature {} unattributed (only unsupported signer types)\n",
                attribution.index
            ),
            _ => format!(
                "  signature {} unattributed ({})\n",
                attribution.index,
                to_base64(&attribution.signature)
            ),
        };
        output.push_str(&line);
    }
}

fn render_requirement(
    output: &mut String,
    requirement: &AuthorizationRequirement,
    outcome: Option<&AuthorizationOutcome>,
) {
    let met = outcome.is_some_and(|o| o.met);

    output.push_str("\nSignatures are required for the account with Key:\n");
    output.push_str(&format!("  {}\n", requirement.account_id));
    output.push_str(&format!(
        "They must have a cumulative weight of: {} ({} threshold)\n",
        requirement.required_weight, requirement.threshold
    ));
    if let Some(outcome) = outcome {
        output.push_str(&format!(
            "Contributed weight: {}\n",
            outcome.contributed_weight
        ));
    }
    output.push_str(if met { "Requirement Met\n" } else { "Not Met\n" });

    for signer in &requirement.signers {
        let contributed = outcome.is_some_and(|o| {
            o.contributing_signatures
                .iter()
                .any(|sig| sig.signer_key() == Some(signer.key.as_str()))
        });
        output.push_str(&format!(
            "  Public Key: {}  Weight: {}  Type: {}{}\n",
            signer.key,
            signer.weight,
            signer.signer_type.as_str(),
            if contributed {
                "  Contributed Signature"
            } else {
                ""
            }
        ));
    }
}

/// Human-readable view of an account snapshot
pub fn render_account(snapshot: &AccountSnapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", snapshot.account_id));
    if let Some(sequence) = &snapshot.sequence {
        output.push_str(&format!("Sequence Number: {}\n", sequence));
    }
    output.push_str(&format!(
        "Thresholds: low {} / medium {} / high {}\n",
        snapshot.thresholds.low, snapshot.thresholds.medium, snapshot.thresholds.high
    ));

    output.push_str("Signers:\n");
    for signer in &snapshot.signers {
        output.push_str(&format!(
            "  Public Key: {}  Weight: {}  Type: {}\n",
            signer.key,
            signer.weight,
            signer.signer_type.as_str()
        ));
    }

    if !snapshot.balances.is_empty() {
        output.push_str("Balances:\n");
        for balance in &snapshot.balances {
            output.push_str(&format!(
                "  {} {}\n",
                balance.balance,
                balance.asset_label()
            ));
        }
    }

    output
}
