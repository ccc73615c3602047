//! Config command - manage local configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::local::LocalConfig;
use crate::search::FailurePolicy;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Set the translation endpoint URL
    SetEndpoint(SetEndpointCmd),

    /// Set the translation model (default: gemini-2.0-flash)
    SetModel(SetModelCmd),

    /// Set the maximum number of results per search (default: 1000)
    SetMaxResults(SetMaxResultsCmd),

    /// Set what happens when the file index fails (default: degrade)
    SetPolicy(SetPolicyCmd),

    /// Show current configuration
    Show,
}

#[derive(Args)]
pub struct SetEndpointCmd {
    /// Endpoint URL (e.g., https://translate.example.com/query)
    pub url: String,
}

#[derive(Args)]
pub struct SetModelCmd {
    /// Model name (e.g., gemini-2.0-flash)
    pub model: String,
}

#[derive(Args)]
pub struct SetMaxResultsCmd {
    pub max_results: usize,
}

#[derive(Args)]
pub struct SetPolicyCmd {
    #[arg(value_enum)]
    pub policy: FailurePolicy,
}

impl ConfigCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            ConfigSubCmd::SetEndpoint(cmd) => {
                let mut config = LocalConfig::load()?;
                config.endpoint = cmd.url.clone();
                config.save()?;
                println!("Endpoint set to: {}", cmd.url);
            }
            ConfigSubCmd::SetModel(cmd) => {
                let mut config = LocalConfig::load()?;
                config.model = cmd.model.clone();
                config.save()?;
                println!("Model set to: {}", cmd.model);
            }
            ConfigSubCmd::SetMaxResults(cmd) => {
                let mut config = LocalConfig::load()?;
                config.max_results = cmd.max_results;
                config.save()?;
                println!("Max results set to: {}", cmd.max_results);
            }
            ConfigSubCmd::SetPolicy(cmd) => {
                let mut config = LocalConfig::load()?;
                config.on_index_failure = cmd.policy;
                config.save()?;
                println!("Index failure policy set to: {}", cmd.policy);
            }
            ConfigSubCmd::Show => {
                let config = LocalConfig::load()?;
                println!("Config: {}", LocalConfig::config_path()?.display());
                println!();
                println!(
                    "endpoint:     {}",
                    if config.has_endpoint() {
                        config.endpoint.as_str()
                    } else {
                        "(not set)"
                    }
                );
                println!("model:        {} ({})", config.model, config.model_type);
                println!("timeout:      {}s", config.request_timeout_secs);
                println!("max_results:  {}", config.max_results);
                println!("on_failure:   {}", config.on_index_failure);
                println!("mdfind:       {}", config.mdfind_path);
            }
        }
        Ok(())
    }
}
