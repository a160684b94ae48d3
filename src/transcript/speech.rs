//! Local speech-to-text over whisper.cpp.
//!
//! Runs the smallest model tier on CPU so transcription works on any
//! machine; GPU execution is deliberately not exposed. Expects 16 kHz mono
//! WAV input.

use super::{Transcript, TranscriptSegment};
use crate::error::SpeechError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Transcribes local audio files with a whisper.cpp model.
pub struct SpeechTranscriber {
    model_path: PathBuf,
}

impl SpeechTranscriber {
    /// Create a transcriber for the given ggml model weights.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    /// Transcribe an audio file into canonical segments.
    ///
    /// The model context is loaded per call and released when the call
    /// returns, on success or failure.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    pub fn transcribe(&self, audio_path: &Path) -> Result<Transcript, SpeechError> {
        if !audio_path.exists() {
            return Err(SpeechError::FileNotFound(audio_path.to_path_buf()));
        }

        let samples = read_samples(audio_path)?;
        debug!("Read {} samples", samples.len());

        let ctx_params = WhisperContextParameters {
            use_gpu: false,
            ..Default::default()
        };
        let model_path = self.model_path.to_str().ok_or_else(|| {
            SpeechError::Model(format!("non-UTF8 model path: {:?}", self.model_path))
        })?;
        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| SpeechError::Model(format!("failed to load model: {e}")))?;

        let params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        let mut state = ctx
            .create_state()
            .map_err(|e| SpeechError::Model(format!("failed to create state: {e}")))?;
        state
            .full(params, &samples)
            .map_err(|e| SpeechError::Model(format!("inference failed: {e}")))?;

        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let text = match segment.to_str() {
                Ok(s) => s,
                Err(_) => continue,
            };
            // Timestamps are centiseconds.
            segments.push(segment_from_bounds(
                text,
                segment.start_timestamp() as f64 / 100.0,
                segment.end_timestamp() as f64 / 100.0,
            )?);
        }

        let language_index = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(language_index).map(|s| s.to_string());

        info!("Transcribed {} segments", segments.len());
        Ok(Transcript::new(segments, language))
    }
}

/// Decode WAV samples to the f32 range the model expects.
fn read_samples(audio_path: &Path) -> Result<Vec<f32>, SpeechError> {
    let mut reader = hound::WavReader::open(audio_path)
        .map_err(|e| SpeechError::Model(format!("failed to read audio: {e}")))?;

    reader
        .samples::<i16>()
        .map(|s| {
            s.map(|v| v as f32 / i16::MAX as f32)
                .map_err(|e| SpeechError::Model(format!("bad audio sample: {e}")))
        })
        .collect()
}

/// Convert model segment boundaries to the canonical `{start, duration}`
/// shape. Inverted or negative boundaries are a model fault, not something
/// to clamp.
fn segment_from_bounds(text: &str, start: f64, end: f64) -> Result<TranscriptSegment, SpeechError> {
    if start < 0.0 || end < start {
        return Err(SpeechError::Model(format!(
            "segment boundaries out of order: start={start:.2}s end={end:.2}s"
        )));
    }

    Ok(TranscriptSegment::new(text.trim(), start, end - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_from_bounds() {
        let segment = segment_from_bounds(" hello ", 1.0, 2.5).unwrap();
        assert_eq!(segment.text, "hello");
        assert_eq!(segment.start, 1.0);
        assert_eq!(segment.duration, 1.5);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(matches!(
            segment_from_bounds("x", 1.0, 0.5),
            Err(SpeechError::Model(_))
        ));
        assert!(matches!(
            segment_from_bounds("x", -0.5, 1.0),
            Err(SpeechError::Model(_))
        ));
    }

    #[test]
    fn test_missing_audio_file() {
        let transcriber = SpeechTranscriber::new("/nonexistent/model.bin");
        let err = transcriber
            .transcribe(Path::new("/nonexistent/audio.wav"))
            .unwrap_err();

        assert!(matches!(err, SpeechError::FileNotFound(_)));
    }

    #[test]
    fn test_unreadable_audio_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-audio.wav");
        std::fs::write(&path, b"this is not a wav file").unwrap();

        let transcriber = SpeechTranscriber::new("/nonexistent/model.bin");
        let err = transcriber.transcribe(&path).unwrap_err();

        assert!(matches!(err, SpeechError::Model(_)));
    }
}
