//! Durable access tokens for directory roots.
//!
//! A token is an opaque byte string that can be exchanged for a live root.
//! [`PathCapability`] encodes the canonical path plus the directory's file
//! identity, and reports a token stale when either no longer matches what
//! the filesystem says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::ScopeError;

/// Serialized capability for one root directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeToken(Vec<u8>);

impl ScopeToken {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A token exchanged for a root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub root: PathBuf,
    /// The token no longer describes the root exactly and should be re-encoded.
    pub stale: bool,
}

/// Encodes, resolves and opens scoped access to directory roots.
pub trait CapabilityProvider: Send {
    fn encode(&self, dir: &Path) -> Result<ScopeToken, ScopeError>;

    /// `None` when the token is unreadable or its root is gone.
    fn resolve(&self, token: &ScopeToken) -> Option<ResolvedToken>;

    /// Begin scoped access. Returns false if the root cannot be opened.
    fn start_access(&self, root: &Path) -> bool;

    fn stop_access(&self, root: &Path);
}

#[derive(Debug, Serialize, Deserialize)]
struct PathTokenBody {
    path: PathBuf,
    #[serde(default)]
    file_id: Option<u64>,
}

/// Plain-filesystem capability provider.
///
/// Tokens hold a path, so renames and moves are not followed: a token whose
/// path no longer exists is unresolvable. Staleness covers a path that now
/// canonicalizes differently (a symlink hop, `..` segments) or a directory
/// replaced at the same path (inode change). Either is re-encoded on resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathCapability;

impl CapabilityProvider for PathCapability {
    fn encode(&self, dir: &Path) -> Result<ScopeToken, ScopeError> {
        let encode_err = |source| ScopeError::Encode {
            path: dir.to_path_buf(),
            source,
        };

        let canonical = fs::canonicalize(dir).map_err(encode_err)?;
        let meta = fs::metadata(&canonical).map_err(encode_err)?;
        if !meta.is_dir() {
            return Err(ScopeError::NotADirectory(dir.to_path_buf()));
        }

        let body = PathTokenBody {
            path: canonical,
            file_id: file_id(&meta),
        };
        let bytes = serde_json::to_vec(&body).map_err(|e| encode_err(std::io::Error::other(e)))?;

        Ok(ScopeToken(bytes))
    }

    fn resolve(&self, token: &ScopeToken) -> Option<ResolvedToken> {
        let body: PathTokenBody = serde_json::from_slice(token.as_bytes()).ok()?;
        let canonical = fs::canonicalize(&body.path).ok()?;
        let meta = fs::metadata(&canonical).ok()?;
        if !meta.is_dir() {
            return None;
        }

        let moved = canonical != body.path;
        let replaced = body.file_id.is_some() && file_id(&meta) != body.file_id;

        Some(ResolvedToken {
            root: canonical,
            stale: moved || replaced,
        })
    }

    fn start_access(&self, root: &Path) -> bool {
        fs::read_dir(root).is_ok()
    }

    fn stop_access(&self, root: &Path) {
        trace!(root = %root.display(), "stopped scoped access");
    }
}

#[cfg(unix)]
fn file_id(meta: &fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ino())
}

#[cfg(not(unix))]
fn file_id(_meta: &fs::Metadata) -> Option<u64> {
    None
}
