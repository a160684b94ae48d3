//! Note generation: learning-package types and generation.
//!
//! The model is asked for a fixed shape but is not trusted to honor it.
//! Whatever well-formed JSON object comes back is coerced into a
//! [`NoteResult`] and shape problems are reported as [`SchemaDeviation`]s
//! alongside the result, so a quiz of 8 or 12 questions is still usable
//! output rather than a hard failure.

mod generator;

pub use generator::{NoteGenerator, NoteOptions};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Number of quiz questions the model is asked for.
pub const QUIZ_LEN: usize = 10;

/// The learning package extracted from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResult {
    /// 2-4 sentence summary.
    pub summary: String,
    /// Concise key points.
    pub key_points: Vec<String>,
    /// Quiz questions; the target length is [`QUIZ_LEN`].
    pub quiz: Vec<String>,
}

/// A shape problem in an otherwise well-formed model response.
///
/// Deviations ride alongside a returned result; they never abort the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDeviation {
    /// The quiz list does not have exactly [`QUIZ_LEN`] entries.
    QuizCount(usize),
    /// The `quiz` key is present but not a list.
    QuizNotList,
    /// The `key_points` key is present but not a list.
    KeyPointsNotList,
}

impl fmt::Display for SchemaDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDeviation::QuizCount(actual) => write!(
                f,
                "quiz did not contain exactly {QUIZ_LEN} questions (got {actual})"
            ),
            SchemaDeviation::QuizNotList => write!(f, "quiz is not a list"),
            SchemaDeviation::KeyPointsNotList => write!(f, "key_points is not a list"),
        }
    }
}

/// A generated result plus any deviations from the requested shape.
#[derive(Debug, Clone)]
pub struct NotePackage {
    pub result: NoteResult,
    pub deviations: Vec<SchemaDeviation>,
}

impl NotePackage {
    /// Coerce a parsed response object into the target shape, recording
    /// deviations instead of failing.
    pub fn from_value(object: &Value) -> Self {
        let mut deviations = Vec::new();

        let summary = object
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // A missing key_points list is benign; a wrong-typed one is not.
        let key_points = match object.get("key_points") {
            None => Vec::new(),
            Some(v) => string_list(v).unwrap_or_else(|| {
                deviations.push(SchemaDeviation::KeyPointsNotList);
                Vec::new()
            }),
        };

        let quiz = match object.get("quiz") {
            Some(v) => match string_list(v) {
                Some(q) => {
                    if q.len() != QUIZ_LEN {
                        deviations.push(SchemaDeviation::QuizCount(q.len()));
                    }
                    q
                }
                None => {
                    deviations.push(SchemaDeviation::QuizNotList);
                    Vec::new()
                }
            },
            None => {
                deviations.push(SchemaDeviation::QuizCount(0));
                Vec::new()
            }
        };

        Self {
            result: NoteResult {
                summary,
                key_points,
                quiz,
            },
            deviations,
        }
    }

    pub fn has_deviations(&self) -> bool {
        !self.deviations.is_empty()
    }
}

/// Coerce a JSON value into a list of strings; `None` if it is not a list.
fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|entries| {
        entries
            .iter()
            .map(|e| match e.as_str() {
                Some(s) => s.to_string(),
                None => e.to_string(),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiz(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Q{i}")).collect()
    }

    #[test]
    fn test_well_formed_result_has_no_deviations() {
        let object = json!({
            "summary": "s",
            "key_points": ["a", "b"],
            "quiz": quiz(10),
        });

        let package = NotePackage::from_value(&object);
        assert!(!package.has_deviations());
        assert_eq!(package.result.summary, "s");
        assert_eq!(package.result.key_points, vec!["a", "b"]);
        assert_eq!(package.result.quiz.len(), QUIZ_LEN);
    }

    #[test]
    fn test_short_quiz_is_soft_failure() {
        let object = json!({"summary": "s", "key_points": ["a"], "quiz": quiz(7)});

        let package = NotePackage::from_value(&object);
        assert_eq!(package.result.quiz.len(), 7);
        assert_eq!(package.deviations, vec![SchemaDeviation::QuizCount(7)]);
    }

    #[test]
    fn test_missing_quiz_counts_as_zero() {
        let package = NotePackage::from_value(&json!({"summary": "s"}));
        assert_eq!(package.deviations, vec![SchemaDeviation::QuizCount(0)]);
    }

    #[test]
    fn test_wrong_typed_fields_flagged() {
        let object = json!({"summary": "s", "key_points": "not a list", "quiz": {"q": 1}});

        let package = NotePackage::from_value(&object);
        assert!(package
            .deviations
            .contains(&SchemaDeviation::KeyPointsNotList));
        assert!(package.deviations.contains(&SchemaDeviation::QuizNotList));
    }

    #[test]
    fn test_missing_key_points_is_benign() {
        let object = json!({"summary": "s", "quiz": quiz(10)});

        let package = NotePackage::from_value(&object);
        assert!(!package.has_deviations());
        assert!(package.result.key_points.is_empty());
    }

    #[test]
    fn test_non_string_entries_coerced() {
        let object = json!({"summary": "s", "key_points": [1, "two"], "quiz": quiz(10)});

        let package = NotePackage::from_value(&object);
        assert_eq!(package.result.key_points, vec!["1", "two"]);
    }
}
