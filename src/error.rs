//! Error types for Lekse.
//!
//! Each pipeline stage has its own error enum so the failure set of a call
//! is visible in its signature; `LekseError` aggregates them for callers
//! that run the whole pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Failures when fetching captions from the remote provider.
#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Captions are disabled for this video.")]
    Disabled,

    #[error("No caption track found for this video.")]
    NotFound,

    #[error("Video is unavailable.")]
    Unavailable,

    #[error("Failed to fetch captions: {0}")]
    Provider(String),
}

/// Failures when transcribing local audio with the speech model.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Speech model failed: {0}")]
    Model(String),
}

/// Failures when generating notes from a transcript.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No API key provided. Pass --api-key or set OPENAI_API_KEY.")]
    NoCredential,

    #[error("Generation provider unreachable: {0}")]
    ProviderUnavailable(String),

    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    #[error("Model returned non-JSON output and automatic parsing failed.\nOutput:\n{raw}")]
    Unparsable { raw: String },
}

/// Library-level error type for Lekse operations.
#[derive(Error, Debug)]
pub enum LekseError {
    #[error("Could not extract a video id from: {0}")]
    IdentifierNotFound(String),

    #[error(transparent)]
    Caption(#[from] CaptionError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("Transcript is empty.")]
    EmptyTranscript,

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Lekse operations.
pub type Result<T> = std::result::Result<T, LekseError>;
