//! Translation client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("invalid translation endpoint: {0:?}")]
    InvalidEndpoint(String),

    #[error("no connectivity to translation service: {0}")]
    NoConnectivity(#[source] reqwest::Error),

    #[error("translation request timed out")]
    Timeout,

    #[error("translation service returned HTTP {0}")]
    ServerError(u16),

    #[error("could not decode translation response: {0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("translation transport error: {0}")]
    UnknownTransport(#[source] reqwest::Error),
}

impl TranslationError {
    /// Classify a reqwest failure that happened before a status was seen.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::NoConnectivity(err)
        } else {
            Self::UnknownTransport(err)
        }
    }
}
