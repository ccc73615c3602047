//! Access scope errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("directory selection cancelled")]
    UserCancelled,

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to encode access token for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grant store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
