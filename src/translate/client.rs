//! HTTP client for the translation endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::TranslationError;
use super::types::{TranslationRequest, TranslationResponse};

/// Anything that can turn a natural-language query into a backend command.
pub trait Translate: Send + Sync {
    fn translate(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<TranslationResponse, TranslationError>> + Send;
}

/// Connection settings for [`TranslationClient`].
#[derive(Debug, Clone)]
pub struct TranslatorSettings {
    pub endpoint: String,
    pub model_type: String,
    pub model: String,
    pub timeout: Duration,
}

/// Single-attempt client for the translation endpoint. Retrying is left to
/// the caller.
pub struct TranslationClient {
    client: Client,
    settings: TranslatorSettings,
}

impl TranslationClient {
    pub fn new(settings: TranslatorSettings) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .user_agent(concat!("telescope/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(TranslationError::UnknownTransport)?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> Result<Url, TranslationError> {
        let raw = self.settings.endpoint.trim();
        let url = Url::parse(raw).map_err(|_| TranslationError::InvalidEndpoint(raw.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(TranslationError::InvalidEndpoint(raw.to_string())),
        }
    }
}

impl Translate for TranslationClient {
    async fn translate(&self, query: &str) -> Result<TranslationResponse, TranslationError> {
        let url = self.endpoint()?;
        let request = TranslationRequest::new(
            query,
            &self.settings.model_type,
            &self.settings.model,
        );

        debug!(url = %url, model = %self.settings.model, "sending translation request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(TranslationError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::ServerError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(TranslationError::from_transport)?;

        let decoded =
            TranslationResponse::from_slice(&body).map_err(TranslationError::DecodingError)?;

        debug!(
            has_command = decoded.command().is_some(),
            has_dates = decoded.has_date_filter(),
            "translation received"
        );

        Ok(decoded)
    }
}
