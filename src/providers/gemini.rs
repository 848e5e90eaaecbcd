//! Generative-content backend (Gemini).

use async_trait::async_trait;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use super::{
    ProviderConfig, ProviderError, TranslationProvider, TranslationResult, batch_message, extract,
    http,
};
use crate::catalog::Batch;
use crate::config::LanguageSet;

/// Provider calling `models/{model}:generateContent`.
pub struct GeminiProvider {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Model and endpoint.
    config: ProviderConfig,
    /// Value of the `x-goog-api-key` header.
    api_key: Zeroizing<String>,
}

impl GeminiProvider {
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

/// What: Join instructions and batch into the single prompt this backend takes.
///
/// Inputs:
/// - `instructions`: Rendered instructions.
/// - `user`: Batch message.
///
/// Output:
/// - `instructions`, a blank line, then `user`.
#[must_use]
pub fn prompt(instructions: &str, user: &str) -> String {
    format!("{instructions}\n\n{user}")
}

/// What: Build the generate-content request body.
///
/// Inputs:
/// - `prompt`: Combined prompt text.
///
/// Output:
/// - JSON body with one content holding one text part.
#[must_use]
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] },
        ],
    })
}

/// What: Pull the generated text out of a generate-content response.
///
/// Inputs:
/// - `body`: Parsed response JSON.
///
/// Output:
/// - Concatenated text of all parts of the first candidate.
///
/// # Errors
/// - `MissingContent` if the first candidate has no text parts.
pub fn response_text(body: &Value) -> Result<String, ProviderError> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or(ProviderError::MissingContent("candidates[0].content.parts"))?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        return Err(ProviderError::MissingContent("candidates[0].content.parts[].text"));
    }
    Ok(text)
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn translate_batch(
        &self,
        batch: &Batch,
        languages: &LanguageSet,
        instructions: &str,
    ) -> Result<TranslationResult, ProviderError> {
        let user = batch_message(batch)?;
        let body = request_body(&prompt(instructions, &user));
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        tracing::debug!(
            provider = self.name(),
            model = %self.config.model,
            batch = batch.index,
            entries = batch.len(),
            languages = languages.len(),
            "[Provider] Sending generate-content request"
        );
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body);
        let response = http::send_json(request).await?;
        extract::parse_fenced(&response_text(&response)?)
    }
}
