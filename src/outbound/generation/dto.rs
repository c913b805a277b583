//! Wire DTOs for the chat-completions endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ports::DescriptionGeneratorError;

/// Request payload for `POST /v1/chat/completions`.
#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequestDto<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessageDto<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Response payload; only the fields this service reads.
#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionResponseDto {
    #[serde(default)]
    choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDto {
    message: ChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageDto {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponseDto {
    /// Extract the first choice's trimmed content.
    pub(super) fn into_completion(self) -> Result<String, DescriptionGeneratorError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DescriptionGeneratorError::decode("response carried no choices"))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| DescriptionGeneratorError::decode("choice carried no content"))?;
        Ok(content.trim().to_owned())
    }
}
