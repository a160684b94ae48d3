//! Configuration module for Lekse.

mod settings;

pub use settings::{CaptionSettings, GeneralSettings, NoteSettings, Settings, SpeechSettings};
