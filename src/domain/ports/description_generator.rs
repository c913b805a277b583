//! Port for the text-generation collaborator.
//!
//! The completion API is an opaque external service: prompt in, text out.
//! Adapters own transport details (endpoint, auth, timeout); the service
//! treats every failure as terminal for the request in flight.

use async_trait::async_trait;

/// Errors raised by description generator adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionGeneratorError {
    /// The completion endpoint could not be reached.
    #[error("completion transport failed: {message}")]
    Transport { message: String },
    /// The request exceeded the configured deadline.
    #[error("completion timed out: {message}")]
    Timeout { message: String },
    /// The provider rejected the request for quota reasons.
    #[error("completion rate limited: {message}")]
    RateLimited { message: String },
    /// The provider answered with a non-success status.
    #[error("completion API returned status {status}: {message}")]
    Api { status: u16, message: String },
    /// The response body could not be decoded into a completion.
    #[error("completion response was malformed: {message}")]
    Decode { message: String },
}

impl DescriptionGeneratorError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port producing a bounded-length completion for a prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Request a completion of at most `max_tokens` tokens. The returned
    /// text is trimmed by the adapter but carries no other guarantees;
    /// callers must reject completions they cannot use.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, DescriptionGeneratorError>;
}

/// Canned completion returned by [`FixtureDescriptionGenerator`].
pub const FIXTURE_COMPLETION: &str =
    "A welcoming property in a sought-after neighbourhood, ready to move in.";

/// Fixture implementation returning a fixed completion, for tests that do
/// not exercise the completion API.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDescriptionGenerator;

#[async_trait]
impl DescriptionGenerator for FixtureDescriptionGenerator {
    async fn complete(
        &self,
        _prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, DescriptionGeneratorError> {
        Ok(FIXTURE_COMPLETION.to_owned())
    }
}
