//! Reqwest-backed description generator.
//!
//! Owns transport details only: request serialisation, bearer auth, the
//! request deadline, HTTP error mapping, and JSON decoding. The upstream is
//! any OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ChatCompletionRequestDto, ChatCompletionResponseDto, ChatMessageDto};
use crate::domain::ports::{DescriptionGenerator, DescriptionGeneratorError};

/// Default model requested from the completion API.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completions generator bound to one endpoint and model.
pub struct OpenAiHttpGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiHttpGenerator {
    /// Build a generator with an explicit request timeout.
    ///
    /// `base_url` is the provider root (e.g. `https://api.openai.com`); the
    /// chat-completions path is appended here.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be extended or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BuildError> {
        let endpoint = base_url
            .join("v1/chat/completions")
            .map_err(|error| BuildError::Endpoint(error.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| BuildError::Client(error.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

/// Errors raised while constructing the generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid completion endpoint: {0}")]
    Endpoint(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[async_trait]
impl DescriptionGenerator for OpenAiHttpGenerator {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, DescriptionGeneratorError> {
        let request = ChatCompletionRequestDto {
            model: &self.model,
            messages: vec![ChatMessageDto {
                role: "system",
                content: prompt,
            }],
            max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: ChatCompletionResponseDto = serde_json::from_slice(&body).map_err(|error| {
            DescriptionGeneratorError::decode(format!("invalid completion JSON: {error}"))
        })?;
        decoded.into_completion()
    }
}

fn map_transport_error(error: reqwest::Error) -> DescriptionGeneratorError {
    if error.is_timeout() {
        DescriptionGeneratorError::timeout(error.to_string())
    } else {
        DescriptionGeneratorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DescriptionGeneratorError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        preview
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => DescriptionGeneratorError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DescriptionGeneratorError::timeout(message)
        }
        _ if status.is_server_error() => DescriptionGeneratorError::transport(message),
        _ => DescriptionGeneratorError::api(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}
