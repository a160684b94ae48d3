//! Transcript types shared by every source.
//!
//! Both the captions provider and the local speech model normalize into the
//! same `{text, start, duration}` segment shape, so downstream code never
//! cares where a transcript came from.

mod captions;
mod speech;

pub use captions::CaptionSource;
pub use speech::SpeechTranscriber;

use serde::{Deserialize, Serialize};

/// One utterance with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text content.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// A complete transcript: ordered segments plus the flattened text.
///
/// Held in memory for the duration of one pipeline run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Segments in source order. No reordering or deduplication is applied.
    pub segments: Vec<TranscriptSegment>,
    /// Segment texts joined with newlines.
    pub full_text: String,
    /// Language reported by the source, when it reports one.
    pub language: Option<String>,
}

impl Transcript {
    /// Create a transcript from segments, deriving the flattened text.
    pub fn new(segments: Vec<TranscriptSegment>, language: Option<String>) -> Self {
        let full_text = flatten(&segments);
        Self {
            segments,
            full_text,
            language,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

/// Join segment texts in sequence order with a single consistent separator.
pub fn flatten(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_empty() {
        assert_eq!(flatten(&[]), "");
    }

    #[test]
    fn test_flatten_preserves_order() {
        let segments = vec![
            TranscriptSegment::new("first", 0.0, 1.0),
            TranscriptSegment::new("second", 1.0, 1.0),
            TranscriptSegment::new("third", 2.0, 1.0),
        ];

        assert_eq!(flatten(&segments), "first\nsecond\nthird");
    }

    #[test]
    fn test_transcript_derives_full_text() {
        let transcript = Transcript::new(
            vec![
                TranscriptSegment::new("hello", 0.0, 1.5),
                TranscriptSegment::new("world", 1.5, 1.5),
            ],
            Some("en".to_string()),
        );

        assert_eq!(transcript.full_text, "hello\nworld");
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_empty_transcript_detected() {
        let transcript = Transcript::new(vec![TranscriptSegment::new("  ", 0.0, 0.5)], None);
        assert!(transcript.is_empty());
    }
}
