//! Local configuration management.
//!
//! Config is stored at `~/.config/telescope/config.toml` and contains:
//! - translation endpoint and model selection
//! - result cap and index failure policy

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::search::FailurePolicy;
use crate::translate::TranslatorSettings;

const CONFIG_DIR: &str = "telescope";
const CONFIG_FILE: &str = "config.toml";
const GRANTS_FILE: &str = "grants.json";

/// Local configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Translation endpoint URL.
    #[serde(default)]
    pub endpoint: String,

    /// Model family named in translation requests (default: gemini).
    #[serde(default = "default_model_type")]
    pub model_type: String,

    /// Model named in translation requests (default: gemini-2.0-flash).
    #[serde(default = "default_model")]
    pub model: String,

    /// Translation request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of results returned per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Behavior when the file index fails mid-search.
    #[serde(default)]
    pub on_index_failure: FailurePolicy,

    /// Path to the `mdfind` binary.
    #[serde(default = "default_mdfind_path")]
    pub mdfind_path: String,
}

fn default_model_type() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_results() -> usize {
    1000
}

fn default_mdfind_path() -> String {
    "mdfind".to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model_type: default_model_type(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            max_results: default_max_results(),
            on_index_failure: FailurePolicy::default(),
            mdfind_path: default_mdfind_path(),
        }
    }
}

impl LocalConfig {
    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Check if a translation endpoint is configured.
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Settings for the translation client.
    pub fn translator_settings(&self) -> TranslatorSettings {
        TranslatorSettings {
            endpoint: self.endpoint.clone(),
            model_type: self.model_type.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Get the persisted grants file path.
    pub fn grants_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(GRANTS_FILE))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join(CONFIG_DIR))
    }
}
