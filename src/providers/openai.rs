//! Chat-completion backend (OpenAI).

use async_trait::async_trait;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use super::{
    ProviderConfig, ProviderError, TranslationProvider, TranslationResult, batch_message, extract,
    http,
};
use crate::catalog::Batch;
use crate::config::LanguageSet;

/// Provider calling `/v1/chat/completions` in JSON mode.
pub struct OpenAiProvider {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Model and endpoint.
    config: ProviderConfig,
    /// Bearer token.
    api_key: Zeroizing<String>,
}

impl OpenAiProvider {
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

/// What: Build the chat-completion request body.
///
/// Inputs:
/// - `model`: Model identifier.
/// - `instructions`: System message.
/// - `user`: User message carrying the batch.
///
/// Output:
/// - JSON body with system and user messages and `json_object` response format.
#[must_use]
pub fn request_body(model: &str, instructions: &str, user: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": instructions },
            { "role": "user", "content": user },
        ],
        "response_format": { "type": "json_object" },
    })
}

/// What: Pull the generated text out of a chat-completion response.
///
/// Inputs:
/// - `body`: Parsed response JSON.
///
/// Output:
/// - `choices[0].message.content`.
///
/// # Errors
/// - `MissingContent` if the field is absent or not a string.
pub fn response_text(body: &Value) -> Result<&str, ProviderError> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or(ProviderError::MissingContent("choices[0].message.content"))
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn translate_batch(
        &self,
        batch: &Batch,
        languages: &LanguageSet,
        instructions: &str,
    ) -> Result<TranslationResult, ProviderError> {
        let user = batch_message(batch)?;
        let body = request_body(&self.config.model, instructions, &user);
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        tracing::debug!(
            provider = self.name(),
            model = %self.config.model,
            batch = batch.index,
            entries = batch.len(),
            languages = languages.len(),
            "[Provider] Sending chat completion"
        );
        let request = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.as_str())
            .json(&body);
        let response = http::send_json(request).await?;
        extract::parse_exact(response_text(&response)?)
    }
}
