//! Directory pickers.
//!
//! The picker is the UI-facing half of a grant: it runs on the caller's
//! thread and either returns chosen directories or reports cancellation.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::error::ScopeError;

/// Text shown when asking the user for directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerPrompt {
    pub message: String,
    pub confirm: String,
}

impl PickerPrompt {
    /// Prompt used when replacing the whole grant set.
    pub fn grant() -> Self {
        Self {
            message: "Pick the folder(s) Telescope is allowed to search.".to_string(),
            confirm: "Grant Access".to_string(),
        }
    }

    /// Prompt used when appending to the grant set.
    pub fn add() -> Self {
        Self {
            message: "Pick additional folder(s) Telescope can search.".to_string(),
            confirm: "Add".to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait DirectoryPicker: Send {
    /// Chosen directories. Dismissing without a choice is `UserCancelled`.
    fn pick(&self, prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError>;
}

/// Directories supplied up front, e.g. from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgsPicker {
    dirs: Vec<PathBuf>,
}

impl ArgsPicker {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl DirectoryPicker for ArgsPicker {
    fn pick(&self, _prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        if self.dirs.is_empty() {
            return Err(ScopeError::UserCancelled);
        }
        Ok(self.dirs.clone())
    }
}

/// Interactive picker reading one directory per line from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPicker;

impl DirectoryPicker for StdinPicker {
    fn pick(&self, prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "{}", prompt.message);
        let _ = writeln!(
            stderr,
            "Enter one directory per line, then a blank line to {}:",
            prompt.confirm.to_lowercase()
        );

        read_dirs(std::io::stdin().lock())
    }
}

/// Picker for non-interactive sessions; always cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPicker;

impl DirectoryPicker for NoPicker {
    fn pick(&self, _prompt: &PickerPrompt) -> Result<Vec<PathBuf>, ScopeError> {
        Err(ScopeError::UserCancelled)
    }
}

fn read_dirs(input: impl BufRead) -> Result<Vec<PathBuf>, ScopeError> {
    let mut dirs = Vec::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        dirs.push(expand_home(line));
    }

    if dirs.is_empty() {
        return Err(ScopeError::UserCancelled);
    }
    Ok(dirs)
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if raw == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw)),
        _ => PathBuf::from(raw),
    }
}
