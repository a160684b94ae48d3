//! Pipeline coordination for Lekse.
//!
//! One run is strictly sequential: resolve the input, acquire a transcript
//! from whichever source fits the input, flatten, generate notes. Nothing
//! is cached or shared between runs.

use crate::config::Settings;
use crate::error::{LekseError, Result};
use crate::notes::{NoteGenerator, NoteOptions, NotePackage};
use crate::openai::Credential;
use crate::resolver::IdResolver;
use crate::transcript::{CaptionSource, SpeechTranscriber, Transcript};
use std::path::Path;
use tracing::{info, instrument};

/// Coordinates a single video-to-notes run.
pub struct Pipeline {
    settings: Settings,
    resolver: IdResolver,
    captions: CaptionSource,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        let captions = CaptionSource::new(&settings.captions.languages);

        Self {
            settings,
            resolver: IdResolver::new(),
            captions,
        }
    }

    /// Acquire a transcript for the input.
    ///
    /// An existing local file goes to the speech model; anything else must
    /// resolve to a video id and goes to the captions provider.
    #[instrument(skip(self))]
    pub async fn transcript(&self, input: &str) -> Result<Transcript> {
        let path = Path::new(input);
        if path.is_file() {
            info!("Input is a local file, transcribing with the speech model");
            let transcriber = SpeechTranscriber::new(self.settings.speech_model_path());
            return Ok(transcriber.transcribe(path)?);
        }

        let id = self
            .resolver
            .resolve(input)
            .ok_or_else(|| LekseError::IdentifierNotFound(input.to_string()))?;
        info!("Resolved video id: {}", id);

        Ok(self.captions.fetch(&id).await?)
    }

    /// Run the full pipeline: acquire, flatten, generate.
    #[instrument(skip(self, api_key))]
    pub async fn notes(
        &self,
        input: &str,
        api_key: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<NotePackage> {
        let transcript = self.transcript(input).await?;
        if transcript.is_empty() {
            return Err(LekseError::EmptyTranscript);
        }
        info!("Transcript length: {} characters", transcript.full_text.len());

        let credential = Credential::resolve(api_key)?;

        let mut options = NoteOptions {
            model: self.settings.notes.model.clone(),
            temperature: self.settings.notes.temperature,
            max_tokens: self.settings.notes.max_tokens,
        };
        if let Some(model) = model_override {
            options.model = model.to_string();
        }

        let generator = NoteGenerator::new(credential, options);
        Ok(generator.generate(&transcript.full_text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[tokio::test]
    async fn test_unresolvable_input_is_identifier_not_found() {
        let pipeline = Pipeline::new(Settings::default());

        let err = pipeline.transcript("definitely not a video").await.unwrap_err();
        assert!(matches!(err, LekseError::IdentifierNotFound(_)));
    }
}
