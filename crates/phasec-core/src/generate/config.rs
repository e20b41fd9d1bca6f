//! Backend selection and connection settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::GenerateError;

/// Default completion budget per phase.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default HTTP timeout for one generation request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Which hosted API serves completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-haiku-4-5-20251001",
            Self::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_api_key_env(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        };
        f.write_str(s)
    }
}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            other => Err(ProviderParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Provider`] string.
#[derive(Debug, Clone)]
pub struct ProviderParseError(pub String);

impl fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid provider: {:?} (expected anthropic or openai)",
            self.0
        )
    }
}

impl std::error::Error for ProviderParseError {}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Fully resolved settings for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub provider: Provider,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Settings with every field at the provider's default.
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_owned(),
            api_key_env: provider.default_api_key_env().to_owned(),
            base_url: provider.default_base_url().to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, GenerateError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GenerateError::MissingApiKey {
                var: self.api_key_env.clone(),
            }),
        }
    }

    /// Join `path` onto `base_url`, tolerating a trailing slash.
    pub(super) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}
