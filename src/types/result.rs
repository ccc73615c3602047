//! Result model handed to the presentation layer.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde::{Serialize, Serializer};

/// Placeholder shown when the index has no timestamp for a file.
pub const UNKNOWN_DATE: &str = "Unknown";

/// A raw match as reported by the file index, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl SearchHit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            created_at: None,
            modified_at: None,
        }
    }
}

/// Coarse file classification derived from the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
    Zip,
    /// Known type outside the fixed categories, carried by its MIME identifier.
    Other(String),
    Unknown,
}

impl FileType {
    pub fn as_str(&self) -> &str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Pdf => "pdf",
            FileType::Text => "text",
            FileType::Zip => "zip",
            FileType::Other(identifier) => identifier,
            FileType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FileType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One surfaced match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Position of the hit in the backend's result order.
    pub id: usize,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub created_display: String,
    pub modified_display: String,
}

impl FileResult {
    pub fn from_hit(id: usize, hit: &SearchHit, file_type: FileType) -> Self {
        let path = hit.path.to_string_lossy().into_owned();
        let name = hit
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());

        Self {
            id,
            name,
            path,
            file_type,
            created_display: display_date(hit.created_at),
            modified_display: display_date(hit.modified_at),
        }
    }
}

/// Short local date-time, e.g. `5/1/25, 3:04 PM`.
pub fn display_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| {
        ts.with_timezone(&Local)
            .format("%-m/%-d/%y, %-I:%M %p")
            .to_string()
    })
    .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Terminal output of one search.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub files: Vec<FileResult>,
    pub total_results: usize,
    /// True when at least one admitted match was left out because of the cap.
    pub has_more: bool,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }
}
