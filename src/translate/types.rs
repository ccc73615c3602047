//! Wire types for the translation endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Request body: `{query, modelType, modelConfig: {model}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub query: String,
    pub model_type: String,
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    pub model: String,
}

impl TranslationRequest {
    pub fn new(query: &str, model_type: &str, model: &str) -> Self {
        Self {
            query: query.to_string(),
            model_type: model_type.to_string(),
            model_config: ModelConfig {
                model: model.to_string(),
            },
        }
    }
}

/// Decoded translation response.
///
/// The endpoint returns a flat object of optional strings. Unknown keys are
/// ignored; legacy key names are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Index-native command. Absent means the model could not translate.
    #[serde(default, alias = "mdfind_command")]
    pub search_command: Option<String>,

    /// Inclusive lower bound, `yyyy-MM-dd`.
    #[serde(default, alias = "startDate_filter")]
    pub start_date_filter: Option<String>,

    /// Inclusive upper bound, `yyyy-MM-dd`.
    #[serde(default, alias = "endDate_filter")]
    pub end_date_filter: Option<String>,

    #[serde(default, alias = "useCreation", deserialize_with = "flag_as_string")]
    pub use_creation_date: Option<String>,
}

impl TranslationResponse {
    /// Decode a response body. Anything other than a JSON object is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(object))
    }

    /// The search command, if present and not blank.
    pub fn command(&self) -> Option<&str> {
        self.search_command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn has_date_filter(&self) -> bool {
        self.start_date_filter.is_some() || self.end_date_filter.is_some()
    }

    /// Whether date filtering compares creation time. Defaults to true.
    pub fn use_creation_date(&self) -> bool {
        self.use_creation_date
            .as_deref()
            .map(truthy)
            .unwrap_or(true)
    }
}

/// Lenient truthiness: after whitespace, an optional sign and leading zeros,
/// a leading `Y`, `y`, `T`, `t` or digit `1`-`9` is true.
fn truthy(raw: &str) -> bool {
    let s = raw.trim_start();
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let s = s.trim_start_matches('0');
    matches!(s.chars().next(), Some('Y' | 'y' | 'T' | 't' | '1'..='9'))
}

fn flag_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(b) => b.to_string(),
        Flag::Text(s) => s,
    }))
}
