//! Common Utility Functions
//!
//! Small helpers shared across the pipeline.

use std::fmt::Display;

/// Truncate to at most `max_chars` characters without splitting a code point.
///
/// Returns the input unchanged when it already fits.
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Truncate and mark the cut so readers (and the model) know content is missing
pub fn truncate_with_marker(content: &str, max_chars: usize, marker: &str) -> String {
    let truncated = truncate_chars(content, max_chars);
    if truncated.len() == content.len() {
        content.to_string()
    } else {
        format!("{}{}", truncated, marker)
    }
}

/// First `max_chars` characters followed by an ellipsis line when cut
pub fn preview(content: &str, max_chars: usize) -> String {
    truncate_with_marker(content, max_chars, "\n\n…")
}

/// Log and discard an error from a best-effort operation.
///
/// # Example
/// ```ignore
/// let created = log_warn(upsert_comment(...).await, "updating PR comment").is_some();
/// ```
pub fn log_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}
