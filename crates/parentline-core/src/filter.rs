//! Substring-based content filter.
//!
//! Rejects generated replies that look like the model breaking character.
//! Matching is case-sensitive: "AI" is rejected, "said" is not.

use parentline_types::error::RelayError;

/// Substrings that cause a reply to be replaced.
pub const BANNED_SUBSTRINGS: [&str; 3] = ["Sorry", "AI", "language model"];

pub struct ContentFilter;

impl ContentFilter {
    /// Return the trimmed reply, or [`RelayError::FilterRejected`] when it
    /// is empty or contains a banned substring.
    pub fn check(reply: &str) -> Result<String, RelayError> {
        let trimmed = reply.trim();
        if trimmed.is_empty() {
            return Err(RelayError::FilterRejected);
        }
        if let Some(banned) = BANNED_SUBSTRINGS.iter().find(|s| trimmed.contains(*s)) {
            tracing::debug!(banned = %banned, "Reply rejected by content filter");
            return Err(RelayError::FilterRejected);
        }
        Ok(trimmed.to_string())
    }
}
