//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Review text is customer-authored and dataset paths may reveal user
//! directories, so spans only ever carry bounded previews, file names or
//! hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Characters of review text allowed in a span field.
const PREVIEW_CHARS: usize = 40;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Returns the first few characters of `text`, marking truncation with `…`.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Returns a short deterministic hash of a text for correlation without
/// exposing its content.
pub fn hash_text(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}
