//! Helpers for keeping extracted content out of span attributes.
//!
//! Page text routinely carries company names, people and contact details.
//! Spans and log lines get a short preview or a hash instead.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// First `max_chars` characters of `text` with whitespace collapsed,
/// followed by `...` when truncated.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

/// Short deterministic hash of a text for correlation without exposing it.
pub fn hash_text(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_redact_path_returns_filename() {
        let path = PathBuf::from("/home/user/decks/acme_profile.pdf");
        assert_eq!(redact_path(&path), "acme_profile.pdf");
    }

    #[test]
    fn test_preview_text_truncates_on_char_boundary() {
        assert_eq!(preview_text("Société Générale SA", 7), "Société...");
        assert_eq!(preview_text("short", 10), "short");
        assert_eq!(preview_text("  multi \n line  ", 20), "multi line");
    }

    #[test]
    fn test_hash_text_is_deterministic() {
        let a = hash_text("Acme Corp");
        assert_eq!(a, hash_text("Acme Corp"));
        assert_ne!(a, hash_text("Globex"));
        assert_eq!(a.len(), 16);
    }
}
