//! Note generation against the language-model provider.
//!
//! The request side is fixed: a system instruction constraining the model
//! to a three-key JSON object, the transcript embedded verbatim in the user
//! message, and a low temperature. The response side assumes nothing: the
//! payload text is located through a chain of accessor paths, and the JSON
//! object is recovered from prose-wrapped output when the model ignores the
//! instruction.

use super::NotePackage;
use crate::error::GenerateError;
use crate::openai::{create_client, Credential};
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str = "You are an assistant that converts a video transcript into a learning package. \
     Return ONLY valid JSON with keys: summary (string), key_points (list of short strings), \
     quiz (list of EXACTLY 10 strings). \
     Do not include any extra commentary outside the JSON. Keep the summary short (2-4 sentences).";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Accessor paths tried in order to locate the response text.
const CONTENT_PATHS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/text",
    "/output/0/content/0/text",
];

fn user_prompt(transcript: &str) -> String {
    format!(
        "Here is the transcript:\n\n{transcript}\n\n\
         From this transcript:\n\
         1) Create a short summary (2-4 sentences).\n\
         2) Give important key points as a concise list.\n\
         3) Generate exactly 10 quiz questions (clear, varied difficulty).\n\
         Return the result as JSON exactly like: {{\n  \"summary\": \"...\",\n  \"key_points\": [\"...\", ...],\n  \"quiz\": [\"Q1\", \"Q2\", ...]\n}}\n"
    )
}

/// Sampling options for note generation.
#[derive(Debug, Clone)]
pub struct NoteOptions {
    /// Model name to request.
    pub model: String,
    /// Low by default; schema compliance over creativity.
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1200,
        }
    }
}

/// How a backend attempt ended short of a usable payload.
enum BackendFailure {
    /// The provider could not be reached or its response surface could not
    /// be decoded; the next backend may still work.
    Unreachable(String),
    /// The provider rejected the request; trying another backend would
    /// send the same request to the same judge.
    Rejected(String),
}

/// One way of calling the generation provider.
#[async_trait]
trait ChatBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send the two-message request and return the raw response payload.
    async fn complete(&self, user: &str, options: &NoteOptions) -> Result<Value, BackendFailure>;
}

/// Typed client backend.
struct SdkBackend {
    client: async_openai::Client<OpenAIConfig>,
}

#[async_trait]
impl ChatBackend for SdkBackend {
    fn name(&self) -> &'static str {
        "sdk"
    }

    async fn complete(&self, user: &str, options: &NoteOptions) -> Result<Value, BackendFailure> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| BackendFailure::Rejected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| BackendFailure::Rejected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&options.model)
            .messages(messages)
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .build()
            .map_err(|e| BackendFailure::Rejected(e.to_string()))?;

        match self.client.chat().create(request).await {
            Ok(response) => serde_json::to_value(response)
                .map_err(|e| BackendFailure::Unreachable(format!("unencodable response: {e}"))),
            Err(OpenAIError::ApiError(e)) => Err(BackendFailure::Rejected(e.message)),
            Err(OpenAIError::JSONDeserialize(e)) => Err(BackendFailure::Unreachable(format!(
                "undecodable response surface: {e}"
            ))),
            Err(e) => Err(BackendFailure::Unreachable(e.to_string())),
        }
    }
}

/// Raw HTTP backend; decodes nothing beyond JSON so it keeps working when
/// the typed surface and the provider disagree.
struct HttpBackend {
    http: reqwest::Client,
    credential: Credential,
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn complete(&self, user: &str, options: &NoteOptions) -> Result<Value, BackendFailure> {
        let body = serde_json::json!({
            "model": options.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user},
            ],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(self.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendFailure::Unreachable(e.to_string()))?;

        let status = response.status();
        let value: Value = response
            .json()
            .await
            .map_err(|e| BackendFailure::Unreachable(format!("undecodable response: {e}")))?;

        if !status.is_success() {
            let message = value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(BackendFailure::Rejected(message));
        }

        Ok(value)
    }
}

/// Generates a learning package from flattened transcript text.
pub struct NoteGenerator {
    backends: Vec<Box<dyn ChatBackend>>,
    options: NoteOptions,
}

impl NoteGenerator {
    /// Create a generator for the given credential and options.
    pub fn new(credential: Credential, options: NoteOptions) -> Self {
        let backends: Vec<Box<dyn ChatBackend>> = vec![
            Box::new(SdkBackend {
                client: create_client(&credential),
            }),
            Box::new(HttpBackend {
                http: reqwest::Client::new(),
                credential,
            }),
        ];

        Self { backends, options }
    }

    /// Generate notes, recovering a structured result from whatever text
    /// the model returns.
    #[instrument(skip_all, fields(transcript_chars = transcript.len()))]
    pub async fn generate(&self, transcript: &str) -> Result<NotePackage, GenerateError> {
        let user = user_prompt(transcript);
        let raw = self.complete(&user).await?;

        let text = response_text(&raw);
        let object = parse_note_object(text.trim())?;

        Ok(NotePackage::from_value(&object))
    }

    /// Try each backend in order; first usable payload wins.
    async fn complete(&self, user: &str) -> Result<Value, GenerateError> {
        let mut unreachable = Vec::new();

        for backend in &self.backends {
            match backend.complete(user, &self.options).await {
                Ok(value) => {
                    debug!("Backend {} answered", backend.name());
                    return Ok(value);
                }
                Err(BackendFailure::Rejected(message)) => {
                    return Err(GenerateError::RequestFailed(message));
                }
                Err(BackendFailure::Unreachable(message)) => {
                    warn!("Backend {} unreachable: {}", backend.name(), message);
                    unreachable.push(format!("{}: {}", backend.name(), message));
                }
            }
        }

        Err(GenerateError::ProviderUnavailable(unreachable.join("; ")))
    }
}

/// Locate the textual content in a raw response payload.
///
/// Tries each known accessor path, then falls back to the payload's string
/// form.
fn response_text(response: &Value) -> String {
    CONTENT_PATHS
        .iter()
        .find_map(|path| response.pointer(path).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| response.to_string())
}

/// Parse the response text into a JSON object, recovering from prose
/// wrapping.
fn parse_note_object(text: &str) -> Result<Value, GenerateError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Ok(value);
        }
    }

    // Recovery: the span from the first `{` to the last `}`, newlines
    // included. Commentary that itself contains braces widens the span.
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(GenerateError::Unparsable {
                raw: text.to_string(),
            })
        }
    };

    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(Value::is_object)
        .ok_or_else(|| GenerateError::Unparsable {
            raw: text.to_string(),
        })
}
