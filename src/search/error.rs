//! Search pipeline errors.

use thiserror::Error;

use super::index::IndexError;
use crate::scope::ScopeError;
use crate::translate::TranslationError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("translation response has no search command")]
    MissingCommand,

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl SearchError {
    /// The user dismissed the directory picker.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Scope(ScopeError::UserCancelled))
    }
}
