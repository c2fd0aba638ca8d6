//! Envelope coordinator
//!
//! Entry point of the engine. An envelope is decoded as a fee-bump first and
//! only then as a plain transaction, since a fee-bump wraps a complete inner
//! transaction envelope.

use super::evaluator::evaluate_all;
use super::matcher::{candidate_signers, match_signatures};
use super::resolver::{resolve_demands, transaction_demands, AccountDemand};
use crate::envelope::XdrEnvelopeParser;
use crate::errors::AnalysisError;
use crate::provider::AccountDataProvider;
use crate::types::{
    AnalysisResult, AuthorizationReport, DecoratedSignature, Envelope, EnvelopeKind,
    FeeBumpReport, SignatureAttribution, SignatureResult, Signer, ThresholdLevel,
};
use std::future::Future;
use tracing::{debug, error, info, warn};

/// In-flight account fetches per analysis run
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Runs the authorization pipeline for envelopes of one network
pub struct Analyzer<P> {
    provider: P,
    parser: XdrEnvelopeParser,
    fetch_concurrency: usize,
}

impl<P: AccountDataProvider> Analyzer<P> {
    pub fn new(provider: P, parser: XdrEnvelopeParser) -> Self {
        Self {
            provider,
            parser,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn parser(&self) -> &XdrEnvelopeParser {
        &self.parser
    }

    /// Decode `raw_base64`, trying the fee-bump form before the plain form
    pub fn parse_envelope(&self, raw_base64: &str) -> Result<Envelope, AnalysisError> {
        match self.parser.parse_fee_bump(raw_base64) {
            Ok(fee_bump) => return Ok(Envelope::FeeBump(fee_bump)),
            Err(e) => debug!("Not a fee-bump envelope ({}), trying plain transaction", e),
        }

        let transaction = self.parser.parse_transaction(raw_base64)?;
        Ok(Envelope::Plain(transaction))
    }

    /// Analyze a base64 envelope
    pub async fn analyze(&self, raw_base64: &str) -> Result<AnalysisResult, AnalysisError> {
        let result = match self.parse_envelope(raw_base64) {
            Ok(envelope) => self.analyze_envelope(envelope).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!("Analysis aborted: {}", e);
        }
        result
    }

    /// Analyze a base64 envelope, giving up as soon as `cancel` completes.
    ///
    /// Dropping the run drops the in-flight account fetches with it.
    pub async fn analyze_with_cancellation<C>(
        &self,
        raw_base64: &str,
        cancel: C,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.analyze(raw_base64) => result,
            _ = cancel => {
                warn!("Analysis cancelled before completion");
                Err(AnalysisError::Cancelled)
            }
        }
    }

    /// Analyze an already decoded envelope
    pub async fn analyze_envelope(
        &self,
        envelope: Envelope,
    ) -> Result<AnalysisResult, AnalysisError> {
        match envelope {
            Envelope::Plain(transaction) => {
                info!(
                    "Analyzing transaction {} with {} operations and {} signatures",
                    transaction.hash_hex(),
                    transaction.operations.len(),
                    transaction.signatures.len()
                );

                let demands = transaction_demands(&transaction)?;
                let authorization = self
                    .authorize(
                        &demands,
                        &transaction.signatures,
                        &transaction.signing_payload,
                    )
                    .await;

                Ok(AnalysisResult {
                    kind: EnvelopeKind::Plain,
                    transaction,
                    authorization,
                    fee_bump: None,
                })
            }
            Envelope::FeeBump(fee_bump) => {
                let inner = fee_bump.inner;
                info!(
                    "Analyzing fee-bump by {} around transaction {} with {} operations",
                    fee_bump.fee_source,
                    inner.hash_hex(),
                    inner.operations.len()
                );

                // Classify the inner operations before fetching anything
                let inner_demands = transaction_demands(&inner)?;
                let fee_demands = [AccountDemand::new(
                    fee_bump.fee_source.clone(),
                    ThresholdLevel::Low,
                )];

                let (fee_authorization, authorization) = tokio::join!(
                    self.authorize(
                        &fee_demands,
                        &fee_bump.signatures,
                        &fee_bump.signing_payload
                    ),
                    self.authorize(&inner_demands, &inner.signatures, &inner.signing_payload),
                );

                Ok(AnalysisResult {
                    kind: EnvelopeKind::FeeBump,
                    transaction: inner,
                    authorization,
                    fee_bump: Some(FeeBumpReport {
                        fee_source: fee_bump.fee_source,
                        fee: fee_bump.fee,
                        signing_payload: fee_bump.signing_payload,
                        authorization: fee_authorization,
                    }),
                })
            }
        }
    }

    /// Resolve, match and evaluate one signed payload
    async fn authorize(
        &self,
        demands: &[AccountDemand],
        signatures: &[DecoratedSignature],
        payload: &[u8; 32],
    ) -> AuthorizationReport {
        let resolution = resolve_demands(&self.provider, demands, self.fetch_concurrency).await;

        let candidates = candidate_signers(&resolution.requirements);
        let candidate_count = candidates.len();
        let attributions = attribute_signatures(*payload, signatures, candidates).await;
        let outcomes = evaluate_all(&resolution.requirements, &attributions);

        debug!(
            "{} requirements, {} candidate signers, {} of {} signatures attributed",
            resolution.requirements.len(),
            candidate_count,
            attributions.iter().filter(|a| a.verified()).count(),
            attributions.len()
        );

        AuthorizationReport {
            requirements: resolution.requirements,
            attributions,
            outcomes,
            fetch_failures: resolution.fetch_failures,
        }
    }
}

/// Run [`match_signatures`] on tokio's blocking pool
async fn attribute_signatures(
    payload: [u8; 32],
    signatures: &[DecoratedSignature],
    candidates: Vec<Signer>,
) -> Vec<SignatureAttribution> {
    let owned = signatures.to_vec();
    let task =
        tokio::task::spawn_blocking(move || match_signatures(&payload, &owned, &candidates));

    match task.await {
        Ok(attributions) => attributions,
        Err(e) => {
            error!("Signature matching task failed: {}", e);
            signatures
                .iter()
                .enumerate()
                .map(|(index, signature)| {
                    SignatureAttribution::unattributed(index, signature, SignatureResult::Unverified)
                })
                .collect()
        }
    }
}
