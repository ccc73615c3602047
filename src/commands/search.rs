//! Search command - find local files from a natural-language query.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::Mutex;

use crate::local::{self, LocalConfig};
use crate::scope::{DirectoryPicker, NoPicker, StdinPicker};
use crate::search::{FailurePolicy, MdfindIndex, SearchEngine, SearchOptions};
use crate::translate::TranslationClient;

#[derive(Args)]
pub struct SearchCmd {
    /// Natural language query, e.g. "PDFs I edited last week"
    pub query: String,

    /// Max results (default from config)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Translation endpoint (overrides config)
    #[arg(long, env = "TELESCOPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Fail when the file index errors instead of returning no results
    #[arg(long)]
    pub strict: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCmd {
    pub async fn run(&self) -> Result<()> {
        let mut config = LocalConfig::load()?;
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }

        let picker: Box<dyn DirectoryPicker> = if std::io::stdin().is_terminal() {
            Box::new(StdinPicker)
        } else {
            Box::new(NoPicker)
        };
        let scopes = Arc::new(Mutex::new(local::open_scope_manager(picker)?));

        let options = SearchOptions {
            max_results: self.limit.unwrap_or(config.max_results),
            on_index_failure: if self.strict {
                FailurePolicy::Propagate
            } else {
                config.on_index_failure
            },
        };

        let engine = SearchEngine::new(
            TranslationClient::new(config.translator_settings())?,
            MdfindIndex::new(&config.mdfind_path),
            scopes,
            options,
        );

        let progress = (!self.json && std::io::stderr().is_terminal()).then(|| {
            let mut phases = engine.subscribe();
            tokio::spawn(async move {
                while phases.changed().await.is_ok() {
                    if let Some(label) = phases.borrow_and_update().label() {
                        eprintln!("{}...", label);
                    }
                }
            })
        });

        let start = std::time::Instant::now();
        let result = engine.search(&self.query).await;
        if let Some(progress) = progress {
            progress.abort();
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => {
                println!("Search cancelled: no folders granted. Run `telescope grant add <dir>`.");
                return Ok(());
            }
            Err(e) => return Err(e).context("Search failed"),
        };
        let elapsed = start.elapsed().as_millis();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            return Ok(());
        }

        println!("Found {} results in {}ms\n", outcome.total_results, elapsed);

        for (i, file) in outcome.files.iter().enumerate() {
            println!("{}. [{}] {}", i + 1, file.file_type, file.name);
            println!("   {}", file.path);
            println!(
                "   created {}  modified {}",
                file.created_display, file.modified_display
            );
        }

        if outcome.has_more {
            println!("\nMore matches available; raise --limit to see them.");
        }

        Ok(())
    }
}
