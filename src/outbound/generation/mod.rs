//! Outbound adapter for the completion API.

mod dto;
mod openai_http_generator;

pub use openai_http_generator::{BuildError, OpenAiHttpGenerator, DEFAULT_MODEL};
