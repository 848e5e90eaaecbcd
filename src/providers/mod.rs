//! Translation backends.
//!
//! Each backend is an opaque text-completion service: it receives the instructions and a
//! batch rendered as JSON, and returns free text that must be parsed back into catalog
//! entries. One concrete type per backend implements [`TranslationProvider`]; the backend
//! is chosen once per run through [`ProviderKind`].

pub mod anthropic;
pub mod extract;
pub mod gemini;
mod http;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::catalog::{Batch, Strings};
use crate::config::{ConfigError, LanguageSet};

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Entries returned by a provider, keyed like the catalog.
pub type TranslationResult = Strings;

/// Prefix of the user message carrying the batch JSON.
pub const BATCH_PREFIX: &str = "Original text and existing translations: ";

/// Request timeout applied to every provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A backend able to translate one batch per call.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// What: Translate one batch.
    ///
    /// Inputs:
    /// - `batch`: Entries to translate, with their existing localizations.
    /// - `languages`: Required languages for this run.
    /// - `instructions`: Rendered system instructions.
    ///
    /// Output:
    /// - Translated entries keyed by string key.
    ///
    /// # Errors
    /// - Any [`ProviderError`]: transport, HTTP status, missing content, unparseable text or
    ///   schema violations.
    async fn translate_batch(
        &self,
        batch: &Batch,
        languages: &LanguageSet,
        instructions: &str,
    ) -> Result<TranslationResult, ProviderError>;
}

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Chat-completion style (`/v1/chat/completions`).
    OpenAi,
    /// Message style (`/v1/messages`).
    Anthropic,
    /// Generative-content style (`:generateContent`).
    Gemini,
}

impl ProviderKind {
    /// All supported backends.
    pub const ALL: [Self; 3] = [Self::OpenAi, Self::Anthropic, Self::Gemini];

    /// Name accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Environment variable holding the API key.
    #[must_use]
    pub const fn credential_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Anthropic => "claude-3-opus-20240229",
            Self::Gemini => "gemini-1.5-pro",
        }
    }

    /// API base URL.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnsupportedProvider(s.to_string()))
    }
}

/// Per-run connection settings for a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Model identifier sent with each request.
    pub model: String,
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// What: Default connection settings for `kind`, optionally overriding the model.
    ///
    /// Inputs:
    /// - `kind`: Selected backend.
    /// - `model`: Model override; `None` keeps the backend default.
    ///
    /// Output:
    /// - Config pointing at the public API endpoint.
    #[must_use]
    pub fn for_kind(kind: ProviderKind, model: Option<&str>) -> Self {
        Self {
            model: model.unwrap_or(kind.default_model()).to_string(),
            base_url: kind.default_base_url().to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// What: Construct the provider for `kind`.
///
/// Inputs:
/// - `kind`: Selected backend.
/// - `config`: Model, endpoint and timeout.
/// - `api_key`: Credential for the backend.
///
/// Output:
/// - Boxed provider ready for use by the pipeline.
///
/// # Errors
/// - `ProviderError::Transport` if the HTTP client cannot be built.
pub fn build_provider(
    kind: ProviderKind,
    config: ProviderConfig,
    api_key: Zeroizing<String>,
) -> Result<Box<dyn TranslationProvider>, ProviderError> {
    let client = http::build_client(config.timeout)?;
    Ok(match kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(client, config, api_key)),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(client, config, api_key)),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(client, config, api_key)),
    })
}

/// What: Render the batch as the user message shared by all backends.
///
/// Inputs:
/// - `batch`: Entries to translate.
///
/// Output:
/// - [`BATCH_PREFIX`] followed by the pretty JSON of the batch.
///
/// # Errors
/// - `ProviderError::Payload` if the batch cannot be serialized.
pub fn batch_message(batch: &Batch) -> Result<String, ProviderError> {
    let json = batch
        .to_pretty_json()
        .map_err(|source| ProviderError::Payload {
            source,
            snippet: String::new(),
        })?;
    Ok(format!("{BATCH_PREFIX}{json}"))
}

/// What: Error type for a single provider call.
///
/// Inputs: Produced by the HTTP layer and response parsing.
///
/// Output: Implements `Display`/`Error`.
///
/// Details:
/// - Every variant is confined to the batch that produced it; the pipeline logs it and moves on.
#[derive(Debug)]
pub enum ProviderError {
    /// Request could not be sent or the body could not be read.
    Transport(reqwest::Error),
    /// Backend answered with a non-success status.
    Status {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Response body, truncated.
        body: String,
    },
    /// Response JSON lacked the field holding the generated text.
    MissingContent(&'static str),
    /// Text (or the request batch) was not valid JSON for the catalog schema.
    Payload {
        /// Underlying JSON error.
        source: serde_json::Error,
        /// Start of the offending text.
        snippet: String,
    },
    /// Text parsed but violated a catalog invariant.
    Schema(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "provider returned {status}: {body}")
            }
            Self::MissingContent(field) => {
                write!(f, "response did not contain {field}")
            }
            Self::Payload { source, snippet } if snippet.is_empty() => {
                write!(f, "invalid JSON payload: {source}")
            }
            Self::Payload { source, snippet } => {
                write!(f, "invalid JSON payload: {source} (near \"{snippet}\")")
            }
            Self::Schema(msg) => write!(f, "response violates catalog schema: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Payload { source, .. } => Some(source),
            Self::Status { .. } | Self::MissingContent(_) | Self::Schema(_) => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}
