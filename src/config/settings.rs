//! Configuration settings for Lekse.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub captions: CaptionSettings,
    pub speech: SpeechSettings,
    pub notes: NoteSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Caption retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Preferred caption track language codes, in order.
    pub languages: Vec<String>,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }
}

/// Local speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Path to ggml model weights. The tiny tier keeps CPU inference fast.
    pub model_path: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            model_path: "~/.lekse/models/ggml-tiny.bin".to_string(),
        }
    }
}

/// Note generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteSettings {
    /// LLM model for note generation.
    pub model: String,
    /// Sampling temperature; low favors schema compliance.
    pub temperature: f32,
    /// Response token budget.
    pub max_tokens: u32,
}

impl Default for NoteSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1200,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lekse")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded speech model path.
    pub fn speech_model_path(&self) -> PathBuf {
        Self::expand_path(&self.speech.model_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.captions.languages, vec!["en"]);
        assert_eq!(settings.notes.model, "gpt-4o-mini");
        assert_eq!(settings.notes.max_tokens, 1200);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [notes]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.notes.model, "gpt-4.1");
        assert_eq!(settings.notes.temperature, 0.2);
        assert_eq!(settings.captions.languages, vec!["en"]);
    }
}
