//! File index backends.

use std::future::Future;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::types::SearchHit;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("file index unavailable: {0}")]
    Unavailable(#[source] std::io::Error),

    #[error("file index query failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },
}

/// A filesystem index that evaluates native predicates.
pub trait SearchIndex: Send + Sync {
    /// Run `predicate` over all `scopes` as one query, returning matching
    /// paths in index order.
    ///
    /// Resolves once the index has gathered its complete result set. Dropping
    /// the future stops the query.
    fn query(
        &self,
        predicate: &str,
        scopes: &[PathBuf],
    ) -> impl Future<Output = Result<Vec<PathBuf>, IndexError>> + Send;

    /// Timestamps for one match. Missing metadata leaves them unset.
    fn stat(&self, path: &Path) -> SearchHit;
}

/// Spotlight index queried through `mdfind`.
///
/// The child process is killed if the query future is dropped before it
/// exits, so an abandoned search never leaves a query running.
#[derive(Debug, Clone)]
pub struct MdfindIndex {
    program: PathBuf,
}

impl MdfindIndex {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MdfindIndex {
    fn default() -> Self {
        Self::new("mdfind")
    }
}

impl SearchIndex for MdfindIndex {
    async fn query(&self, predicate: &str, scopes: &[PathBuf]) -> Result<Vec<PathBuf>, IndexError> {
        let args = build_args(predicate, scopes);
        debug!(program = %self.program.display(), scopes = scopes.len(), predicate, "starting index query");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(IndexError::Unavailable)?;

        let output = child
            .wait_with_output()
            .await
            .map_err(IndexError::Unavailable)?;

        if !output.status.success() {
            return Err(IndexError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let paths = parse_output(&output.stdout);
        debug!(hits = paths.len(), "index gathering finished");
        Ok(paths)
    }

    fn stat(&self, path: &Path) -> SearchHit {
        let mut hit = SearchHit::new(path);
        match std::fs::metadata(path) {
            Ok(meta) => {
                hit.created_at = meta.created().ok().map(DateTime::<Utc>::from);
                hit.modified_at = meta.modified().ok().map(DateTime::<Utc>::from);
            }
            Err(e) => trace!(path = %path.display(), error = %e, "no metadata for hit"),
        }
        hit
    }
}

/// `-0 [-onlyin <scope>]... <predicate>`
fn build_args(predicate: &str, scopes: &[PathBuf]) -> Vec<OsString> {
    let mut args = Vec::with_capacity(scopes.len() * 2 + 2);
    args.push("-0".into());
    for scope in scopes {
        args.push("-onlyin".into());
        args.push(scope.as_os_str().to_os_string());
    }
    args.push(predicate.into());
    args
}

/// Split NUL-separated output into paths, preserving order and raw bytes.
fn parse_output(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|&b| b == 0)
        .map(|p| p.strip_suffix(b"\n").unwrap_or(p))
        .filter(|p| !p.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let scopes = vec![PathBuf::from("/Users/me/Documents"), PathBuf::from("/Users/me/Downloads")];
        let args = build_args("kind:pdf", &scopes);
        assert_eq!(
            args,
            vec!["-0", "-onlyin", "/Users/me/Documents", "-onlyin", "/Users/me/Downloads", "kind:pdf"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parse_output() {
        let out = b"/a/one.pdf\0/b/two words.txt\0\0/c/three\n\0";
        assert_eq!(
            parse_output(out),
            vec![
                PathBuf::from("/a/one.pdf"),
                PathBuf::from("/b/two words.txt"),
                PathBuf::from("/c/three"),
            ]
        );
        assert!(parse_output(b"").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_output_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let paths = parse_output(b"/a/caf\xe9.txt\0");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].as_os_str().as_bytes(), b"/a/caf\xe9.txt");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let index = MdfindIndex::new("/nonexistent/telescope-mdfind");
        let err = index.query("kind:pdf", &[]).await.unwrap_err();
        assert!(matches!(err, IndexError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let index = MdfindIndex::new("false");
        let err = index.query("kind:pdf", &[]).await.unwrap_err();
        assert!(matches!(err, IndexError::Failed { .. }));
    }

    #[test]
    fn test_stat() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let index = MdfindIndex::default();
        let hit = index.stat(&file);
        assert_eq!(hit.path, file);
        assert!(hit.modified_at.is_some());

        let missing = index.stat(Path::new("/nonexistent/file"));
        assert!(missing.created_at.is_none() && missing.modified_at.is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_stat_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(std::ffi::OsStr::from_bytes(b"caf\xe9.txt"));
        std::fs::write(&file, "x").unwrap();

        let mut raw = file.as_os_str().as_bytes().to_vec();
        raw.push(0);
        let paths = parse_output(&raw);

        let hit = MdfindIndex::default().stat(&paths[0]);
        assert!(hit.modified_at.is_some());
    }
}
