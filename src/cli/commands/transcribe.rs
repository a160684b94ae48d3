//! Transcribe command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Transcript sizes above this tend to truncate downstream generation.
const LARGE_TRANSCRIPT_CHARS: usize = 15_000;

/// Run the transcribe command: acquire and print the transcript.
pub async fn run_transcribe(input: &str, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::new(settings);

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = match pipeline.transcript(input).await {
        Ok(t) => {
            spinner.finish_and_clear();
            t
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Could not fetch transcript: {e}"));
            return Err(e.into());
        }
    };

    if transcript.is_empty() {
        Output::error("Transcript is empty.");
        return Err(anyhow::anyhow!("transcript is empty"));
    }

    Output::success(&format!(
        "Transcript fetched: {} segments, {} characters{}",
        transcript.segments.len(),
        transcript.full_text.len(),
        transcript
            .language
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default()
    ));

    if transcript.full_text.len() > LARGE_TRANSCRIPT_CHARS {
        Output::warning(
            "Transcript is large; generation may be truncated. Consider a shorter video.",
        );
    }

    println!("\n{}", transcript.full_text);

    Ok(())
}
