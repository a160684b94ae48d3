//! Video identifier resolution.
//!
//! Extracts the canonical 11-character video id from the URL forms the
//! provider uses (short links, watch links, shorts, embeds) or from a bare
//! id. Resolution is a lookup, not a validation step: `None` is the normal
//! "this input names no video" answer, and a resolved id is never
//! re-checked downstream.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a canonical video id.
pub const VIDEO_ID_LEN: usize = 11;

/// A resolved, provider-specific video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves video ids from heterogeneous URL forms.
pub struct IdResolver {
    patterns: Vec<Regex>,
}

impl IdResolver {
    pub fn new() -> Self {
        // Priority order matters: first match wins.
        let patterns = [
            r"youtu\.be/([A-Za-z0-9_-]{11})",
            r"[?&]v=([A-Za-z0-9_-]{11})",
            r"/shorts/([A-Za-z0-9_-]{11})",
            r"/embed/([A-Za-z0-9_-]{11})",
            r"^([A-Za-z0-9_-]{11})$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect();

        Self { patterns }
    }

    /// Extract the video id from a URL or bare-id string.
    ///
    /// Returns `None` when no rule applies; callers must branch on it.
    pub fn resolve(&self, input: &str) -> Option<VideoId> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(input) {
                if let Some(m) = caps.get(1) {
                    return Some(VideoId(m.as_str().to_string()));
                }
            }
        }

        // Fallback: last non-empty path segment, accepted only at the
        // canonical length.
        let candidate = input
            .trim_end_matches(['/', '\n', ' '])
            .rsplit('/')
            .next()?;
        if candidate.len() == VIDEO_ID_LEN {
            return Some(VideoId(candidate.to_string()));
        }

        None
    }
}

impl Default for IdResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_forms() {
        let resolver = IdResolver::new();

        for input in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=PLx&v=dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ] {
            assert_eq!(
                resolver.resolve(input).map(|id| id.to_string()),
                Some("dQw4w9WgXcQ".to_string()),
                "failed for {input}"
            );
        }
    }

    #[test]
    fn test_resolve_fallback_path_segment() {
        let resolver = IdResolver::new();

        assert_eq!(
            resolver
                .resolve("https://example.com/videos/dQw4w9WgXcQ/")
                .map(|id| id.to_string()),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_resolve_rejects_invalid() {
        let resolver = IdResolver::new();

        assert_eq!(resolver.resolve(""), None);
        assert_eq!(resolver.resolve("   "), None);
        assert_eq!(resolver.resolve("not a url"), None);
        assert_eq!(resolver.resolve("https://example.com/too-short/abc"), None);
    }

    #[test]
    fn test_watch_url() {
        let resolver = IdResolver::new();
        let id = resolver.resolve("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
