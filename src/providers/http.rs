//! Shared HTTP plumbing for provider requests.

use std::time::Duration;

use serde_json::Value;

use super::ProviderError;

/// Maximum number of body characters kept in error messages.
const BODY_PREVIEW_CHARS: usize = 500;

/// What: Build the HTTP client used for provider calls.
///
/// Inputs:
/// - `timeout`: Whole-request timeout.
///
/// Output:
/// - Configured `reqwest::Client`.
///
/// # Errors
/// - `ProviderError::Transport` if the client cannot be constructed.
pub(super) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(timeout)
        .user_agent(format!("xcstrings-translate/{}", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// What: Send a JSON request and decode the JSON response.
///
/// Inputs:
/// - `request`: Prepared request (URL, headers, body).
///
/// Output:
/// - Parsed response body.
///
/// # Errors
/// - `Transport` on send or body-read failures.
/// - `Status` on non-success responses, with a truncated body.
/// - `Payload` when the body is not JSON.
pub(super) async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Status {
            status,
            body: preview(&text),
        });
    }
    serde_json::from_str(&text).map_err(|source| ProviderError::Payload {
        source,
        snippet: preview(&text),
    })
}

/// What: Truncate text for inclusion in error messages.
///
/// Inputs:
/// - `text`: Arbitrary response text.
///
/// Output:
/// - At most [`BODY_PREVIEW_CHARS`] characters, with `…` appended when cut.
pub(super) fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
    out.push('…');
    out
}
