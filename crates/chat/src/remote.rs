use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::{ChatMessage, Role};

/// Errors from the optional remote services. Callers treat every variant
/// the same way: degrade to the local behavior.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("no API key configured")]
    MissingKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed response body")]
    Malformed,
}

/// Configuration for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            api_key: None,
            model: "gpt-4".into(),
            system_prompt: "You are the site owner's portfolio assistant. Keep responses \
                concise (2-3 paragraphs max) and friendly."
                .into(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Deserialize)]
struct CompletionChoiceMessage {
    content: String,
}

/// Blocking client for the chat-completion endpoint.
pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::blocking::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn has_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// POST the system prompt plus conversation history and return the
    /// completion text.
    pub fn respond(
        &self,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String, RemoteError> {
        let key = self.config.api_key.as_deref().ok_or(RemoteError::MissingKey)?;

        let mut messages = vec![WireMessage {
            role: "system",
            content: &self.config.system_prompt,
        }];
        for entry in history {
            messages.push(WireMessage {
                role: match entry.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &entry.text,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: user_message,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        let body: CompletionResponse = response.json().map_err(|_| RemoteError::Malformed)?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(RemoteError::Malformed)
    }
}

/// Configuration for the speech-synthesis endpoint.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub voice_id: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.elevenlabs.io/v1/text-to-speech".into(),
            api_key: None,
            voice_id: "21m00Tcm4TlvDq8ikWAM".into(),
            model_id: "eleven_monolingual_v1".into(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// Blocking client for the speech-synthesis endpoint.
pub struct SpeechClient {
    config: SpeechConfig,
    client: reqwest::blocking::Client,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn has_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// POST `text` and return the audio payload bytes.
    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>, RemoteError> {
        let key = self.config.api_key.as_deref().ok_or(RemoteError::MissingKey)?;
        let url = format!("{}/{}", self.config.endpoint, self.config.voice_id);

        let response = self
            .client
            .post(url)
            .header("xi-api-key", key)
            .header("accept", "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.config.model_id,
                voice_settings: VoiceSettings {
                    stability: self.config.stability,
                    similarity_boost: self.config.similarity_boost,
                },
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(response.bytes()?.to_vec())
    }
}
