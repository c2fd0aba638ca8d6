use super::{horizon_config, load_config};
use crate::errors::AppResult;
use crate::horizon::HorizonClient;
use crate::provider::{AccountDataProvider, StaticAccountProvider};
use crate::report::{format_account, OutputFormat};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AccountCommand {
    /// Account id (G... strkey)
    account_id: String,

    /// Horizon URL (overrides config.toml)
    #[arg(long)]
    horizon_url: Option<String>,

    /// JSON file of saved Horizon account records to use instead of Horizon
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Print the account as JSON
    #[arg(long)]
    json: bool,
}

impl AccountCommand {
    pub async fn run(&self) -> AppResult<()> {
        let snapshot = match &self.accounts {
            Some(path) => {
                StaticAccountProvider::from_file(path)?
                    .fetch_account(&self.account_id)
                    .await?
            }
            None => {
                let app_config = load_config()?;
                let horizon = horizon_config(&app_config, self.horizon_url.as_deref(), None);
                let client = HorizonClient::new(horizon)?;
                client.fetch_account(&self.account_id).await?
            }
        };

        println!(
            "{}",
            format_account(&snapshot, OutputFormat::from_json_flag(self.json))?
        );
        Ok(())
    }
}
