//! Test doubles shared by scope and engine tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::capability::{CapabilityProvider, PathCapability, ResolvedToken, ScopeToken};
use super::error::ScopeError;
use super::store::BlobStore;

/// In-memory store; clones share state so tests can inspect it.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    inner: Arc<Mutex<HashMap<String, Vec<Vec<u8>>>>>,
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Vec<Vec<u8>>, ScopeError> {
        Ok(self.inner.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, blobs: &[Vec<u8>]) -> Result<(), ScopeError> {
        self.inner
            .lock()
            .unwrap()
            .insert(key.to_string(), blobs.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ScopeError> {
        self.inner.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Path capability that tracks which roots currently hold access.
#[derive(Debug, Default, Clone)]
pub struct RecordingCapability {
    open: Arc<Mutex<Vec<PathBuf>>>,
    starts: Arc<Mutex<usize>>,
}

impl RecordingCapability {
    pub fn open_roots(&self) -> Vec<PathBuf> {
        self.open.lock().unwrap().clone()
    }

    pub fn start_count(&self) -> usize {
        *self.starts.lock().unwrap()
    }
}

impl CapabilityProvider for RecordingCapability {
    fn encode(&self, dir: &Path) -> Result<ScopeToken, ScopeError> {
        PathCapability.encode(dir)
    }

    fn resolve(&self, token: &ScopeToken) -> Option<ResolvedToken> {
        PathCapability.resolve(token)
    }

    fn start_access(&self, root: &Path) -> bool {
        *self.starts.lock().unwrap() += 1;
        let ok = PathCapability.start_access(root);
        if ok {
            self.open.lock().unwrap().push(root.to_path_buf());
        }
        ok
    }

    fn stop_access(&self, root: &Path) {
        let mut open = self.open.lock().unwrap();
        if let Some(pos) = open.iter().position(|r| r == root) {
            open.remove(pos);
        }
    }
}
