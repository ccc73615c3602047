//! File-backed blob store for persisted grants.
//!
//! Blobs are kept hex-encoded in a small JSON document:
//! ```text
//! { "granted_roots": ["7b2270617468...", ...] }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scope::{BlobStore, ScopeError};

type Document = BTreeMap<String, Vec<String>>;

/// JSON file mapping keys to ordered blob lists.
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Document, ScopeError> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = std::fs::read(&self.path)?;
        serde_json::from_slice(&content)
            .map_err(|e| ScopeError::Store(format!("{}: {}", self.path.display(), e)))
    }

    fn write(&self, doc: &Document) -> Result<(), ScopeError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            serde_json::to_vec_pretty(doc).map_err(|e| ScopeError::Store(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Vec<Vec<u8>>, ScopeError> {
        let doc = self.read()?;
        let Some(encoded) = doc.get(key) else {
            return Ok(Vec::new());
        };

        encoded
            .iter()
            .map(|blob| hex::decode(blob).map_err(|e| ScopeError::Store(format!("{key}: {e}"))))
            .collect()
    }

    fn set(&self, key: &str, blobs: &[Vec<u8>]) -> Result<(), ScopeError> {
        let mut doc = self.read()?;
        doc.insert(key.to_string(), blobs.iter().map(hex::encode).collect());
        self.write(&doc)
    }

    fn remove(&self, key: &str) -> Result<(), ScopeError> {
        let mut doc = self.read()?;
        if doc.remove(key).is_some() {
            self.write(&doc)?;
        }
        Ok(())
    }
}
