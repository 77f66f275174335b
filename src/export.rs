//! Download descriptors for converted content.
//!
//! Nothing is written to disk here; a host decides where the bytes go.

use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// File name, MIME type and size for a piece of converted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    /// Suggested file name, including the extension
    pub filename: String,
    /// MIME type
    pub content_type: String,
    /// Extension with the leading dot
    pub extension: String,
    /// Format name
    pub format: String,
    /// Content size in UTF-8 bytes
    pub size_bytes: usize,
}

/// Extension and MIME type for a format. Unknown formats map to plain text.
pub fn file_info(format: &str) -> (&'static str, &'static str) {
    match format {
        "markdown" => (".md", "text/markdown"),
        _ => (".txt", "text/plain"),
    }
}

/// Generate a timestamped file name such as `ocr_result_20240102_150405.md`.
pub fn generate_filename(format: &str) -> String {
    let (extension, _) = file_info(format);
    format!(
        "ocr_result_{}{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Replace the extension of `filename` with the one for `format`.
///
/// Trailing separators are dropped along with the old extension. A name
/// without a final component, such as `..`, gets the extension appended.
pub fn ensure_extension(filename: &str, format: &str) -> String {
    let (extension, _) = file_info(format);
    let mut path = PathBuf::from(filename);
    if path.set_extension(extension.trim_start_matches('.')) {
        path.to_string_lossy().into_owned()
    } else {
        format!("{}{}", filename, extension)
    }
}

/// Build a descriptor for `content`. An empty or missing filename is
/// generated.
pub fn describe(content: &str, format: &str, filename: Option<&str>) -> ExportDescriptor {
    let (extension, content_type) = file_info(format);
    let filename = match filename.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => ensure_extension(name, format),
        None => generate_filename(format),
    };

    ExportDescriptor {
        filename,
        content_type: content_type.to_string(),
        extension: extension.to_string(),
        format: format.to_string(),
        size_bytes: content.len(),
    }
}
