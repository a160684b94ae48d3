//! CLI module for Lekse.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lekse - Video to Learning Package
///
/// Paste a video link and get a short summary, key points, and exactly 10
/// quiz questions. The name "Lekse" comes from the Norwegian word for
/// "lesson."
#[derive(Parser, Debug)]
#[command(name = "lekse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a summary, key points, and quiz from a video
    Notes {
        /// Video URL/id, or a local audio file path
        input: String,

        /// LLM model to use for note generation
        #[arg(short, long)]
        model: Option<String>,

        /// OpenAI API key (defaults to the OPENAI_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Fetch or transcribe and print the transcript only
    Transcribe {
        /// Video URL/id, or a local audio file path
        input: String,
    },
}
