use crate::common::envelopes::*;
use crate::common::keypair;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use stellar_txn_inspector::auth::Analyzer;
use stellar_txn_inspector::cli::{Cli, Commands};
use stellar_txn_inspector::envelope::XdrEnvelopeParser;
use stellar_txn_inspector::provider::StaticAccountProvider;
use stellar_txn_inspector::report::{format_analysis, render_analysis, OutputFormat};
use stellar_txn_inspector::types::AnalysisResult;
use tempfile::NamedTempFile;

/// Offline analysis from saved Horizon account records

fn write_snapshots(records: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(records.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[tokio::test]
async fn test_analyze_with_snapshot_file() -> Result<()> {
    let source = keypair(1);
    let cosigner = keypair(2);
    let records = format!(
        r#"[
            {{
                "account_id": "{source}",
                "sequence": "4294967296",
                "thresholds": {{"low_threshold": 1, "med_threshold": 2, "high_threshold": 2}},
                "signers": [
                    {{"key": "{cosigner}", "type": "ed25519_public_key", "weight": 1}},
                    {{"key": "{source}", "type": "ed25519_public_key", "weight": 1}}
                ],
                "balances": [{{"balance": "100.0000000", "asset_type": "native"}}]
            }}
        ]"#,
        source = source.account_id,
        cosigner = cosigner.account_id
    );
    let file = write_snapshots(&records)?;

    let provider = StaticAccountProvider::from_file(file.path())?;
    assert_eq!(provider.len(), 1);

    let tx = transaction(
        muxed(&source),
        vec![operation(Some(&source), set_options())],
    );
    let raw = signed_envelope(tx, &[&source, &cosigner]);
    let result = Analyzer::new(provider, XdrEnvelopeParser::testnet())
        .analyze(&raw)
        .await?;

    let outcome = &result.authorization.outcomes[0];
    assert_eq!(outcome.required_weight, 2);
    assert_eq!(outcome.contributed_weight, 2);
    assert!(outcome.met);

    let text = render_analysis(&result);
    assert!(text.contains("Signatures are required for the account with Key:"));
    assert!(text.contains("They must have a cumulative weight of: 2 (high threshold)"));
    assert!(text.contains("Requirement Met"));
    assert!(text.contains("Valid Before: 2020-06-11 00:00:00 UTC"));

    let json = format_analysis(&result, OutputFormat::Json)?;
    let decoded: AnalysisResult = serde_json::from_str(&json)?;
    assert_eq!(decoded, result);
    Ok(())
}

#[test]
fn test_snapshot_file_must_be_json_records() -> Result<()> {
    let file = write_snapshots("not json")?;
    assert!(StaticAccountProvider::from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_cli_parses_inspect_arguments() {
    let cli = Cli::try_parse_from([
        "stellar-txn-inspector",
        "inspect",
        "AAAA",
        "--network",
        "public",
        "--accounts",
        "accounts.json",
        "--json",
    ])
    .expect("valid arguments");
    assert!(matches!(cli.command, Commands::Inspect(_)));

    let cli = Cli::try_parse_from(["stellar-txn-inspector", "account", "GABC"])
        .expect("valid arguments");
    assert!(matches!(cli.command, Commands::Account(_)));

    assert!(Cli::try_parse_from([
        "stellar-txn-inspector",
        "inspect",
        "AAAA",
        "--file",
        "envelope.txt"
    ])
    .is_err());
}
