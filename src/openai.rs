//! OpenAI client construction and credential handling.

use crate::error::GenerateError;
use async_openai::{config::OpenAIConfig, Client};
use std::fmt;

/// Environment variable consulted when no explicit key is given.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// The provider API key.
///
/// Held in memory for the duration of a request; redacted from `Debug`
/// output and never logged or written anywhere.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Resolve a credential: explicit argument first, environment second.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, GenerateError> {
        Self::resolve_from(explicit, std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_from(explicit: Option<&str>, env: Option<String>) -> Result<Self, GenerateError> {
        explicit
            .map(str::to_string)
            .filter(|k| !k.trim().is_empty())
            .or(env.filter(|k| !k.trim().is_empty()))
            .map(Credential)
            .ok_or(GenerateError::NoCredential)
    }

    /// The secret itself, for authorizing a request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Create an OpenAI client authorized with the given credential.
pub fn create_client(credential: &Credential) -> Client<OpenAIConfig> {
    Client::with_config(OpenAIConfig::default().with_api_key(credential.expose()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let credential =
            Credential::resolve_from(Some("explicit"), Some("from-env".to_string())).unwrap();
        assert_eq!(credential.expose(), "explicit");
    }

    #[test]
    fn test_env_key_is_fallback() {
        let credential = Credential::resolve_from(None, Some("from-env".to_string())).unwrap();
        assert_eq!(credential.expose(), "from-env");
    }

    #[test]
    fn test_missing_key_is_no_credential() {
        assert!(matches!(
            Credential::resolve_from(None, None),
            Err(GenerateError::NoCredential)
        ));
        // Blank values do not count as credentials.
        assert!(matches!(
            Credential::resolve_from(Some("  "), Some(String::new())),
            Err(GenerateError::NoCredential)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::resolve_from(Some("sk-secret"), None).unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(****)");
    }
}
