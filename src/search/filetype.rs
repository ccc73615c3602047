//! File type classification by extension.

use std::path::Path;

use crate::types::FileType;

/// Extension used by cloud placeholders for files not yet downloaded.
const PLACEHOLDER_EXT: &str = "icloud";

/// MIME types outside `text/*` that are still plain text.
const TEXTUAL_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-sh",
    "application/toml",
    "application/x-yaml",
];

/// Classify a path by its extension, looking through a trailing
/// `.icloud` placeholder extension.
pub fn classify(path: &str) -> FileType {
    let mut path = Path::new(path);
    let stripped;
    if has_extension(path, PLACEHOLDER_EXT) {
        stripped = path.with_extension("");
        path = stripped.as_path();
    }

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileType::Unknown;
    };
    let ext = ext.to_lowercase();

    let Some(mime) = mime_guess::from_ext(&ext).first() else {
        return FileType::Unknown;
    };

    match (mime.type_().as_str(), mime.subtype().as_str()) {
        ("image", _) => FileType::Image,
        ("video", _) => FileType::Video,
        ("audio", _) => FileType::Audio,
        ("application", "pdf") => FileType::Pdf,
        ("text", _) => FileType::Text,
        ("application", "zip") => FileType::Zip,
        _ if TEXTUAL_APPLICATION_TYPES.contains(&mime.essence_str()) => FileType::Text,
        _ => FileType::Other(mime.essence_str().to_string()),
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
