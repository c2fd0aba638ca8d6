use crate::common::envelopes::*;
use crate::common::providers::{HangingProvider, RecordingProvider};
use crate::common::{account, keypair, single_signer_account};
use anyhow::Result;
use std::time::Duration;
use stellar_txn_inspector::auth::Analyzer;
use stellar_txn_inspector::envelope::{XdrEnvelopeParser, PUBLIC_PASSPHRASE};
use stellar_txn_inspector::errors::AnalysisError;
use stellar_txn_inspector::types::{EnvelopeKind, FetchFailureKind, SignatureResult, ThresholdLevel};

/// End-to-end authorization analysis of plain envelopes

fn analyzer(provider: RecordingProvider) -> Analyzer<RecordingProvider> {
    Analyzer::new(provider, XdrEnvelopeParser::testnet())
}

#[tokio::test]
async fn test_payment_signed_by_heavy_signer_is_met() -> Result<()> {
    // thresholds {1, 2, 3}, signers K1 (2) and K2 (1), medium-tier payment signed by K1
    let source = keypair(1);
    let k1 = keypair(11);
    let k2 = keypair(12);
    let dest = keypair(2);
    let provider = RecordingProvider::new(vec![account(
        &source,
        (1, 2, 3),
        vec![k1.signer(2), k2.signer(1)],
    )]);
    let tx = transaction(muxed(&source), vec![operation(Some(&source), payment(&dest))]);

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&k1]))
        .await?;

    assert_eq!(result.kind, EnvelopeKind::Plain);
    assert!(result.fee_bump.is_none());
    let outcome = result
        .authorization
        .outcome_for(&source.account_id)
        .expect("source outcome");
    assert_eq!(outcome.required_weight, 2);
    assert_eq!(outcome.contributed_weight, 2);
    assert!(outcome.met);
    assert!(result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_payment_signed_by_light_signer_is_not_met() -> Result<()> {
    let source = keypair(1);
    let k1 = keypair(11);
    let k2 = keypair(12);
    let dest = keypair(2);
    let provider = RecordingProvider::new(vec![account(
        &source,
        (1, 2, 3),
        vec![k1.signer(2), k2.signer(1)],
    )]);
    let tx = transaction(muxed(&source), vec![operation(Some(&source), payment(&dest))]);

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&k2]))
        .await?;

    let outcome = result
        .authorization
        .outcome_for(&source.account_id)
        .expect("source outcome");
    assert_eq!(outcome.contributed_weight, 1);
    assert!(!outcome.met);
    assert!(!result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_set_options_signed_by_both_signers_is_met() -> Result<()> {
    let source = keypair(1);
    let k1 = keypair(11);
    let k2 = keypair(12);
    let provider = RecordingProvider::new(vec![account(
        &source,
        (1, 2, 3),
        vec![k1.signer(2), k2.signer(1)],
    )]);
    let tx = transaction(muxed(&source), vec![operation(Some(&source), set_options())]);

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&k2, &k1]))
        .await?;

    let requirement = result
        .authorization
        .requirement_for(&source.account_id)
        .expect("source requirement");
    assert_eq!(requirement.threshold, ThresholdLevel::High);
    assert_eq!(requirement.required_weight, 3);

    let outcome = result
        .authorization
        .outcome_for(&source.account_id)
        .expect("source outcome");
    assert_eq!(outcome.contributed_weight, 3);
    assert!(outcome.met);
    assert_eq!(outcome.contributing_signatures.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_source_only_transaction_has_one_low_requirement() -> Result<()> {
    let source = keypair(1);
    let dest = keypair(2);
    let provider = RecordingProvider::new(vec![account(&source, (1, 5, 9), vec![source.signer(1)])]);
    let tx = transaction(
        muxed(&source),
        vec![
            operation(None, payment(&dest)),
            operation(None, account_merge(&dest)),
        ],
    );

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&source]))
        .await?;

    assert_eq!(result.authorization.requirements.len(), 1);
    let requirement = &result.authorization.requirements[0];
    assert_eq!(requirement.account_id, source.account_id);
    assert_eq!(requirement.threshold, ThresholdLevel::Low);
    assert_eq!(requirement.required_weight, 1);
    assert!(result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_multiple_accounts_share_one_signature_pool() -> Result<()> {
    let source = keypair(1);
    let alice = keypair(2);
    let shared = keypair(30);
    let provider = RecordingProvider::new(vec![
        account(&source, (1, 1, 1), vec![source.signer(1), shared.signer(1)]),
        account(&alice, (1, 2, 4), vec![alice.signer(1), shared.signer(4)]),
    ]);
    let tx = transaction(
        muxed(&source),
        vec![operation(Some(&alice), account_merge(&source))],
    );

    // The shared key is listed by both accounts; each applies its own weight
    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&shared]))
        .await?;

    let source_outcome = result
        .authorization
        .outcome_for(&source.account_id)
        .expect("source outcome");
    let alice_outcome = result
        .authorization
        .outcome_for(&alice.account_id)
        .expect("alice outcome");
    assert_eq!(source_outcome.contributed_weight, 1);
    assert_eq!(alice_outcome.required_weight, 4);
    assert_eq!(alice_outcome.contributed_weight, 4);
    assert!(source_outcome.met && alice_outcome.met);
    Ok(())
}

#[tokio::test]
async fn test_malformed_signature_does_not_abort() -> Result<()> {
    let source = keypair(1);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let tx = transaction(muxed(&source), vec![operation(None, bump_sequence())]);
    let raw = envelope_with_signatures(tx, vec![raw_signature(vec![0xab; 17])]);

    let result = analyzer(provider).analyze(&raw).await?;

    let attribution = &result.authorization.attributions[0];
    assert_eq!(attribution.result, SignatureResult::Unverified);
    assert!(!attribution.verified());
    assert!(attribution.contributing_signer.is_none());
    assert_eq!(result.authorization.unattributed().count(), 1);
    assert!(!result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_signature_for_other_network_is_unattributed() -> Result<()> {
    let source = keypair(1);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let tx = transaction(muxed(&source), vec![operation(None, bump_sequence())]);
    let raw = signed_envelope(tx, &[&source]);

    let result = Analyzer::new(provider, XdrEnvelopeParser::new(PUBLIC_PASSPHRASE))
        .analyze(&raw)
        .await?;

    assert_eq!(
        result.authorization.attributions[0].result,
        SignatureResult::Unverified
    );
    assert!(!result.authorization.outcomes[0].met);
    Ok(())
}

#[tokio::test]
async fn test_unknown_operation_type_aborts_before_fetching() -> Result<()> {
    let source = keypair(1);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let tx = transaction(
        muxed(&source),
        vec![
            operation(None, bump_sequence()),
            operation(None, end_sponsoring()),
        ],
    );
    let analyzer = analyzer(provider);

    let err = analyzer
        .analyze(&signed_envelope(tx, &[&source]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AnalysisError::UnknownOperationType {
            index: 1,
            operation_type: "endSponsoringFutureReserves".to_string(),
        }
    );
    assert_eq!(analyzer.provider().total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_envelope_aborts_before_fetching() -> Result<()> {
    let analyzer = analyzer(RecordingProvider::new(Vec::new()));

    let err = analyzer.analyze("AAAAAgAAAAB=").await.unwrap_err();

    assert!(matches!(err, AnalysisError::MalformedEnvelope { .. }));
    assert_eq!(analyzer.provider().total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_overly_nested_envelope_is_malformed() -> Result<()> {
    let source = keypair(1);
    let tx = transaction(
        muxed(&source),
        vec![operation(None, invoke_contract(vec![nested_sc_vec(600)]))],
    );
    let analyzer = analyzer(RecordingProvider::new(vec![single_signer_account(&source)]));

    let err = analyzer
        .analyze(&signed_envelope(tx, &[&source]))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::MalformedEnvelope { .. }));
    assert_eq!(analyzer.provider().total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_account_reported_with_partial_results() -> Result<()> {
    let source = keypair(1);
    let ghost = keypair(2);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let tx = transaction(
        muxed(&source),
        vec![operation(Some(&ghost), payment(&source))],
    );

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &[&source, &ghost]))
        .await?;

    assert!(result
        .authorization
        .outcome_for(&source.account_id)
        .is_some_and(|o| o.met));
    assert!(result.authorization.outcome_for(&ghost.account_id).is_none());
    assert_eq!(result.authorization.fetch_failures.len(), 1);
    assert_eq!(
        result.authorization.fetch_failures[0].kind,
        FetchFailureKind::NotFound
    );
    // ghost's signature has no resolved signer to attribute it to
    assert_eq!(
        result.authorization.attributions[1].result,
        SignatureResult::Unverified
    );
    assert!(!result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_analysis_is_idempotent() -> Result<()> {
    let source = keypair(1);
    let alice = keypair(2);
    let provider = RecordingProvider::new(vec![
        account(&source, (1, 2, 3), vec![source.signer(2)]),
        account(&alice, (0, 1, 2), vec![alice.signer(1)]),
    ]);
    let tx = transaction(
        muxed(&source),
        vec![
            operation(Some(&alice), payment(&source)),
            operation(None, set_options()),
        ],
    );
    let raw = signed_envelope(tx, &[&alice, &source]);
    let analyzer = analyzer(provider);

    let first = analyzer.analyze(&raw).await?;
    let second = analyzer.analyze(&raw).await?;

    assert_eq!(first.authorization, second.authorization);
    assert_eq!(analyzer.provider().calls_for(&source.account_id), 2);
    Ok(())
}

#[tokio::test]
async fn test_v0_envelope_analysis() -> Result<()> {
    let source = keypair(1);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let raw = signed_v0_envelope(&source, vec![operation(None, bump_sequence())], &[&source]);

    let result = analyzer(provider).analyze(&raw).await?;

    assert_eq!(result.kind, EnvelopeKind::Plain);
    assert!(result.fully_authorized());
    Ok(())
}

#[tokio::test]
async fn test_cancellation_stops_pending_fetches() -> Result<()> {
    let source = keypair(1);
    let tx = transaction(muxed(&source), vec![operation(None, bump_sequence())]);
    let raw = signed_envelope(tx, &[&source]);
    let analyzer = Analyzer::new(HangingProvider, XdrEnvelopeParser::testnet());

    let err = analyzer
        .analyze_with_cancellation(&raw, tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap_err();

    assert_eq!(err, AnalysisError::Cancelled);
    Ok(())
}

#[tokio::test]
async fn test_cancellation_signal_that_never_fires() -> Result<()> {
    let source = keypair(1);
    let provider = RecordingProvider::new(vec![single_signer_account(&source)]);
    let tx = transaction(muxed(&source), vec![operation(None, bump_sequence())]);
    let raw = signed_envelope(tx, &[&source]);

    let result = analyzer(provider)
        .analyze_with_cancellation(&raw, std::future::pending())
        .await?;

    assert!(result.fully_authorized());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_signature_set_attributed_in_envelope_order() -> Result<()> {
    // Twenty signatures is the most an envelope can carry
    let source = keypair(1);
    let signers: Vec<_> = (40..60).map(keypair).collect();
    let provider = RecordingProvider::new(vec![account(
        &source,
        (1, 10, 20),
        signers.iter().map(|key| key.signer(1)).collect(),
    )]);
    let tx = transaction(muxed(&source), vec![operation(None, set_options())]);
    let signing: Vec<_> = signers.iter().rev().collect();

    let result = analyzer(provider)
        .analyze(&signed_envelope(tx, &signing))
        .await?;

    let attributions = &result.authorization.attributions;
    assert_eq!(attributions.len(), 20);
    for (index, (attribution, key)) in attributions.iter().zip(&signing).enumerate() {
        assert_eq!(attribution.index, index);
        assert_eq!(attribution.signer_key(), Some(key.account_id.as_str()));
    }
    let outcome = &result.authorization.outcomes[0];
    assert_eq!(outcome.contributed_weight, 20);
    assert!(outcome.met);
    Ok(())
}
