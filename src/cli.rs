//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{ConfigCmd, GrantCmd, SearchCmd, TranslateCmd};

#[derive(Parser)]
#[command(name = "telescope")]
#[command(about = "Telescope - natural-language search for your local files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search granted folders with a natural-language query
    Search(SearchCmd),

    /// Show how a query translates, without searching
    Translate(TranslateCmd),

    /// Manage the folders Telescope may search
    Grant(GrantCmd),

    /// Manage configuration (endpoint, model, limits)
    Config(ConfigCmd),
}

impl Command {
    pub async fn execute(&self) -> anyhow::Result<()> {
        match self {
            Command::Search(cmd) => cmd.run().await,
            Command::Translate(cmd) => cmd.run().await,
            Command::Grant(cmd) => cmd.run().await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["telescope", "search", "pdfs from last week", "-l", "5", "--json"])
            .unwrap();
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "pdfs from last week");
                assert_eq!(cmd.limit, Some(5));
                assert!(cmd.json);
                assert!(!cmd.strict);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_grant_add() {
        let cli = Cli::try_parse_from(["telescope", "grant", "add", "/a", "/b"]).unwrap();
        assert!(matches!(cli.command, Command::Grant(_)));
    }
}
