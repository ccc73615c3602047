//! Local state: configuration and persisted grants.
//!
//! Both live under `~/.config/telescope/`:
//! - `config.toml` - endpoint, model and search settings
//! - `grants.json` - tokens for the directories the user allowed

mod config;
mod store;

pub use config::LocalConfig;
pub use store::FileBlobStore;

use anyhow::Result;

use crate::scope::{AccessScopeManager, DirectoryPicker, PathCapability};

/// Build an access manager over the persisted grant file.
pub fn open_scope_manager(picker: Box<dyn DirectoryPicker>) -> Result<AccessScopeManager> {
    let store = FileBlobStore::new(LocalConfig::grants_path()?);
    Ok(AccessScopeManager::new(
        Box::new(store),
        Box::new(PathCapability),
        picker,
    ))
}
