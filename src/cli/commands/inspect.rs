use super::{horizon_config, load_config};
use crate::auth::Analyzer;
use crate::envelope::{resolve_network_passphrase, XdrEnvelopeParser};
use crate::errors::{AppError, AppResult};
use crate::horizon::HorizonClient;
use crate::provider::{AccountDataProvider, StaticAccountProvider};
use crate::report::{format_analysis, OutputFormat};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct InspectCommand {
    /// Base64 transaction envelope XDR (read from --file or stdin if omitted)
    envelope: Option<String>,

    /// File containing the base64 envelope
    #[arg(long, conflicts_with = "envelope")]
    file: Option<PathBuf>,

    /// Horizon URL (overrides config.toml)
    #[arg(long)]
    horizon_url: Option<String>,

    /// Network passphrase or preset (testnet, public) (overrides config.toml)
    #[arg(long)]
    network: Option<String>,

    /// JSON file of saved Horizon account records to use instead of Horizon
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Concurrent account fetches (overrides config.toml)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl InspectCommand {
    pub async fn run(&self) -> AppResult<()> {
        let app_config = load_config()?;

        let passphrase = match &self.network {
            Some(network) => resolve_network_passphrase(network),
            None => app_config.network.resolved_passphrase(),
        };
        let concurrency = self
            .concurrency
            .unwrap_or(app_config.horizon.concurrent_requests);
        if concurrency == 0 {
            return Err(AppError::InvalidInput(
                "--concurrency must be at least 1".to_string(),
            ));
        }

        let envelope = self.read_envelope()?;
        let parser = XdrEnvelopeParser::new(passphrase);
        info!("Network: {}", parser.network_passphrase());

        let output = match &self.accounts {
            Some(path) => {
                let provider = StaticAccountProvider::from_file(path)?;
                self.analyze(provider, parser, concurrency, &envelope)
                    .await?
            }
            None => {
                let horizon = horizon_config(
                    &app_config,
                    self.horizon_url.as_deref(),
                    Some(concurrency),
                );
                info!("Horizon: {}", horizon.url);
                let client = HorizonClient::new(horizon)?;
                self.analyze(client, parser, concurrency, &envelope).await?
            }
        };

        println!("{}", output);
        Ok(())
    }

    async fn analyze<P: AccountDataProvider>(
        &self,
        provider: P,
        parser: XdrEnvelopeParser,
        concurrency: usize,
        envelope: &str,
    ) -> AppResult<String> {
        let analyzer = Analyzer::new(provider, parser).with_fetch_concurrency(concurrency);
        let result = analyzer
            .analyze_with_cancellation(envelope, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        format_analysis(&result, OutputFormat::from_json_flag(self.json))
    }

    fn read_envelope(&self) -> AppResult<String> {
        let raw = match (&self.envelope, &self.file) {
            (Some(envelope), _) => envelope.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "No transaction envelope provided".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
