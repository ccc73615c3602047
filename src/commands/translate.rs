//! Translate command - show the index command for a query without searching.

use anyhow::{Context, Result};
use clap::Args;

use crate::local::LocalConfig;
use crate::query;
use crate::translate::{Translate, TranslationClient};

#[derive(Args)]
pub struct TranslateCmd {
    /// Natural language query
    pub query: String,

    /// Translation endpoint (overrides config)
    #[arg(long, env = "TELESCOPE_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl TranslateCmd {
    pub async fn run(&self) -> Result<()> {
        let mut config = LocalConfig::load()?;
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }

        let client = TranslationClient::new(config.translator_settings())?;
        let response = client
            .translate(&self.query)
            .await
            .context("Translation failed")?;

        let Some(command) = response.command() else {
            println!("No search command returned.");
            return Ok(());
        };
        let parsed = query::parse(command);

        println!("command:     {}", command);
        println!("predicate:   {}", parsed.predicate);
        println!("scope hint:  {}", parsed.scope_hint.as_deref().unwrap_or("-"));
        if let Some(quoted) = query::extract_scope_hint(command) {
            if parsed.scope_hint.as_deref() != Some(quoted.as_str()) {
                println!("quoted hint: {} (differs from tokenized hint)", quoted);
            }
        }
        println!(
            "dates:       {} .. {}",
            response.start_date_filter.as_deref().unwrap_or("*"),
            response.end_date_filter.as_deref().unwrap_or("*")
        );
        println!(
            "date basis:  {}",
            if response.use_creation_date() {
                "created"
            } else {
                "modified"
            }
        );

        Ok(())
    }
}
