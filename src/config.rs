//! Environment-driven service configuration.
//!
//! Read once at startup. Collaborators degrade gracefully in development:
//! with no store URI the service runs on the in-memory repository, and with
//! no API key descriptions come from the fixture generator.

use std::time::Duration;

use url::Url;

use crate::domain::SearchPolicy;
use crate::outbound::generation::DEFAULT_MODEL;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be an integer, got {value:?}")]
    InvalidInteger { key: &'static str, value: String },
    #[error("{key} must be a valid URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
}

/// Completion API settings.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: Url,
    /// Absent in development; the fixture generator is used instead.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub key_file: String,
    pub cookie_secure: bool,
    /// Permit a generated (non-persistent) signing key outside debug builds.
    pub allow_ephemeral_key: bool,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// Absent in development; the in-memory repository is used instead.
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub completion: CompletionConfig,
    pub search: SearchPolicy,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, for tests.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = match lookup("OPENAI_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl {
                key: "OPENAI_BASE_URL",
                value: raw,
            })?,
            None => Url::parse("https://api.openai.com").unwrap_or_else(|_| {
                unreachable!("default completion endpoint is a valid URL")
            }),
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_owned()),
            mongodb_uri: lookup("MONGODB_URI"),
            mongodb_database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "estate".to_owned()),
            completion: CompletionConfig {
                base_url,
                api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
                timeout: Duration::from_secs(parse_integer(
                    lookup("COMPLETION_TIMEOUT_SECS"),
                    "COMPLETION_TIMEOUT_SECS",
                    30,
                )?),
            },
            search: SearchPolicy {
                max_limit: u32::try_from(parse_integer(
                    lookup("SEARCH_MAX_LIMIT"),
                    "SEARCH_MAX_LIMIT",
                    100,
                )?)
                .unwrap_or(u32::MAX)
                .max(1),
                apply_parking_filter: parse_switch(lookup("SEARCH_PARKING_FILTER"), true),
            },
            session: SessionConfig {
                key_file: lookup("SESSION_KEY_FILE")
                    .unwrap_or_else(|| "/var/run/secrets/session_key".to_owned()),
                cookie_secure: parse_switch(lookup("SESSION_COOKIE_SECURE"), true),
                allow_ephemeral_key: parse_switch(lookup("SESSION_ALLOW_EPHEMERAL"), false),
            },
        })
    }
}

fn parse_integer(
    raw: Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidInteger { key, value }),
        None => Ok(default),
    }
}

/// Boolean switches: `0`/`false`/`off` disable, anything else enables.
fn parse_switch(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref() {
        Some(value) => !matches!(value, "0" | "false" | "off"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_run_without_external_collaborators() {
        let config = AppConfig::from_lookup(&lookup_from(&[])).expect("defaults parse");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(config.mongodb_uri.is_none());
        assert!(config.completion.api_key.is_none());
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert_eq!(config.completion.timeout, Duration::from_secs(30));
        assert_eq!(config.search.max_limit, 100);
        assert!(config.search.apply_parking_filter);
        assert!(config.session.cookie_secure);
    }

    #[test]
    fn reads_the_hardening_knobs() {
        let lookup = lookup_from(&[
            ("SEARCH_MAX_LIMIT", "25"),
            ("SEARCH_PARKING_FILTER", "0"),
            ("SESSION_COOKIE_SECURE", "false"),
        ]);
        let config = AppConfig::from_lookup(&lookup).expect("config parses");
        assert_eq!(config.search.max_limit, 25);
        assert!(!config.search.apply_parking_filter);
        assert!(!config.session.cookie_secure);
    }

    #[test]
    fn rejects_non_numeric_timeouts() {
        let lookup = lookup_from(&[("COMPLETION_TIMEOUT_SECS", "soon")]);
        let error = AppConfig::from_lookup(&lookup).expect_err("invalid integer");
        assert!(matches!(
            error,
            ConfigError::InvalidInteger {
                key: "COMPLETION_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_invalid_completion_urls() {
        let lookup = lookup_from(&[("OPENAI_BASE_URL", "not a url")]);
        let error = AppConfig::from_lookup(&lookup).expect_err("invalid url");
        assert!(matches!(error, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn blank_api_keys_count_as_absent() {
        let lookup = lookup_from(&[("OPENAI_API_KEY", "   ")]);
        let config = AppConfig::from_lookup(&lookup).expect("config parses");
        assert!(config.completion.api_key.is_none());
    }
}
