use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Stellar transaction authorization inspector
#[derive(Parser)]
#[command(name = "stellar-txn-inspector")]
#[command(about = "Inspect which accounts must sign a Stellar transaction and whether they did")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the authorization requirements and signatures of an envelope
    Inspect(commands::inspect::InspectCommand),
    /// Show an account's thresholds, signers and balances
    Account(commands::account::AccountCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(command) => command.run().await,
        Commands::Account(command) => command.run().await,
    }
}
