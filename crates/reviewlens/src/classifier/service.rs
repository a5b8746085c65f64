//! HTTP access to an OpenAI-compatible chat completions endpoint.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ServiceConfig;

/// Maximum length for error bodies kept in [`ServiceError::Status`].
const MAX_ERROR_BODY_LENGTH: usize = 200;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode service response: {0}")]
    Decode(String),

    #[error("service returned no completion text")]
    EmptyReply,
}

/// A text-generation backend that answers a system instruction plus one user message.
pub trait CompletionService {
    fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for `POST {base_url}/chat/completions`.
///
/// Decoding is deterministic (temperature 0) and output is capped at the
/// configured `max_tokens`.
pub struct ChatCompletionsService {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
    max_tokens: u32,
    timeout_secs: u64,
}

impl ChatCompletionsService {
    pub fn new(config: &ServiceConfig, api_key: SecretString) -> Result<Self, ServiceError> {
        Self::with_builder(reqwest::blocking::Client::builder(), config, api_key)
    }

    fn with_builder(
        builder: reqwest::blocking::ClientBuilder,
        config: &ServiceConfig,
        api_key: SecretString,
    ) -> Result<Self, ServiceError> {
        let client = builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionService for ChatCompletionsService {
    fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout_secs)
                } else {
                    ServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            model = %self.model,
            "completion received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ServiceError::EmptyReply)
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... (truncated)", &body[..cut]),
        None => body.to_string(),
    }
}
