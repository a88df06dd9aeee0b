//! OpenAI-compatible Chat Completions backend.
//!
//! POSTs to `{base_url}/v1/chat/completions` with a bearer credential and
//! reads `choices[0].message.content` on success or `error.message` on
//! failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use charla_core::config::CompletionConfig;

use crate::backend::{ChatMessage, CompletionBackend, CompletionRequest};
use crate::error::CompletionError;

/// Longest slice of an unparseable body kept in error messages.
const MAX_BODY_SNIPPET: usize = 200;

/// Connection settings for [`OpenAiBackend`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Base URL (defaults to `https://api.openai.com`).
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: "https://api.openai.com".into(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl From<&CompletionConfig> for OpenAiConfig {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

// ── Wire types ────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Backend ───────────────────────────────────────────────────

/// Completion backend speaking the OpenAI Chat Completions protocol.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CompletionError::MissingApiKey)?;

        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            max_completion_tokens: request.max_completion_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, request))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, request))?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &text));
        }
        parse_completion_body(&text)
    }
}

fn map_transport_error(err: reqwest::Error, request: &CompletionRequest) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout(request.timeout)
    } else {
        CompletionError::Transport(err.to_string())
    }
}

/// Extract `choices[0].message.content` from a success body.
pub fn parse_completion_body(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::Malformed("response has no message content".to_string()))
}

/// Map a non-success body to an API error, or to a malformed-payload error
/// when it carries no `error.message`.
pub fn parse_error_body(status: u16, body: &str) -> CompletionError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => CompletionError::Api {
            status,
            message: parsed.error.message,
        },
        Err(_) => {
            let snippet: String = body.chars().take(MAX_BODY_SNIPPET).collect();
            CompletionError::Malformed(format!("HTTP {} without error message: {}", status, snippet))
        }
    }
}
