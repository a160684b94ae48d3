//! Lekse - Video to Learning Package
//!
//! Turns a video reference into a learning package: a summary, key points,
//! and a ten-question quiz, derived from the video's spoken content.
//!
//! The name "Lekse" comes from the Norwegian word for "lesson."
//!
//! # Overview
//!
//! Lekse allows you to:
//! - Resolve a video id from any of the common URL forms
//! - Fetch captions from the remote provider, or transcribe local audio
//!   with an on-device speech model when no captions exist
//! - Generate structured notes from the transcript, recovering from
//!   prose-wrapped or malformed model output
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `resolver` - Video identifier resolution
//! - `transcript` - Canonical transcript types and both sources
//! - `notes` - Note generation and response recovery
//! - `pipeline` - End-to-end coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use lekse::config::Settings;
//! use lekse::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::new(Settings::load()?);
//!
//!     let package = pipeline.notes("dQw4w9WgXcQ", None, None).await?;
//!     println!("{}", package.result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod notes;
pub mod openai;
pub mod pipeline;
pub mod resolver;
pub mod transcript;

pub use error::{LekseError, Result};
