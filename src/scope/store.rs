//! Key-value blob store holding persisted grants.

use super::error::ScopeError;

/// Persists ordered lists of opaque blobs under string keys.
pub trait BlobStore: Send {
    /// Blobs stored under `key`; empty when the key is absent.
    fn get(&self, key: &str) -> Result<Vec<Vec<u8>>, ScopeError>;

    fn set(&self, key: &str, blobs: &[Vec<u8>]) -> Result<(), ScopeError>;

    fn remove(&self, key: &str) -> Result<(), ScopeError>;
}
