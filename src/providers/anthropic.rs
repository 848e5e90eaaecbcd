//! Message backend (Anthropic).

use async_trait::async_trait;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use super::{
    ProviderConfig, ProviderError, TranslationProvider, TranslationResult, batch_message, extract,
    http,
};
use crate::catalog::Batch;
use crate::config::LanguageSet;

/// API version header value.
const API_VERSION: &str = "2023-06-01";
/// Output token cap per request.
const MAX_TOKENS: u32 = 4000;

/// Provider calling `/v1/messages`.
pub struct AnthropicProvider {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Model and endpoint.
    config: ProviderConfig,
    /// Value of the `x-api-key` header.
    api_key: Zeroizing<String>,
}

impl AnthropicProvider {
    /// Create a provider from a client, connection settings and API key.
    #[must_use]
    pub const fn new(
        client: reqwest::Client,
        config: ProviderConfig,
        api_key: Zeroizing<String>,
    ) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }
}

/// What: Build the messages request body.
///
/// Inputs:
/// - `model`: Model identifier.
/// - `instructions`: System parameter.
/// - `user`: User message carrying the batch.
///
/// Output:
/// - JSON body with `system`, one user message and `max_tokens`.
#[must_use]
pub fn request_body(model: &str, instructions: &str, user: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "system": instructions,
        "messages": [
            { "role": "user", "content": user },
        ],
    })
}

/// What: Pull the generated text out of a messages response.
///
/// Inputs:
/// - `body`: Parsed response JSON.
///
/// Output:
/// - Text of the first content block, or that block serialized when it is not text.
///
/// # Errors
/// - `MissingContent` if there is no first content block.
pub fn response_text(body: &Value) -> Result<String, ProviderError> {
    let block = body
        .pointer("/content/0")
        .ok_or(ProviderError::MissingContent("content[0]"))?;
    if block.get("type").and_then(Value::as_str) == Some("text")
        && let Some(text) = block.get("text").and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }
    Ok(block.to_string())
}

#[async_trait]
impl TranslationProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn translate_batch(
        &self,
        batch: &Batch,
        languages: &LanguageSet,
        instructions: &str,
    ) -> Result<TranslationResult, ProviderError> {
        let user = batch_message(batch)?;
        let body = request_body(&self.config.model, instructions, &user);
        let url = format!("{}/v1/messages", self.config.base_url);
        tracing::debug!(
            provider = self.name(),
            model = %self.config.model,
            batch = batch.index,
            entries = batch.len(),
            languages = languages.len(),
            "[Provider] Sending message request"
        );
        let request = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .json(&body);
        let response = http::send_json(request).await?;
        extract::parse_fenced(&response_text(&response)?)
    }
}
