//! Translation of natural-language queries into index commands.
//!
//! One `POST` per query to the configured endpoint; the JSON body that
//! comes back is decoded once into [`TranslationResponse`].

mod client;
mod error;
mod types;

pub use client::{Translate, TranslationClient, TranslatorSettings};
pub use error::TranslationError;
pub use types::{ModelConfig, TranslationRequest, TranslationResponse};
