use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Upper bound on rich-text bodies (blog content, suggestions).
pub const MAX_CONTENT_BYTES: usize = 1_000_000;
/// Upper bound on short free-text fields (excerpts, comments on reviews).
pub const MAX_NOTE_CHARS: usize = 2_000;

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a required rich-text body.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() || content.len() > MAX_CONTENT_BYTES {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    Ok(())
}

/// Validate an optional short text field such as an excerpt or review note.
pub fn validate_note(note: Option<&str>, name: &str) -> Result<(), AppError> {
    if let Some(note) = note
        && note.chars().count() > MAX_NOTE_CHARS
    {
        return Err(AppError::Validation(format!(
            "{name} must be at most {MAX_NOTE_CHARS} characters"
        )));
    }
    Ok(())
}

/// Trim an optional note, treating blank input as absent.
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Estimated reading time in minutes at 200 words per minute, never below 1.
pub fn estimate_read_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(200).max(1) as i32
}
