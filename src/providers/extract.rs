//! Turning provider text into catalog entries.
//!
//! Chat-completion responses are parsed as-is. Message and generative-content responses
//! often wrap the JSON in a Markdown fence, so candidates are tried in a fixed order:
//! a block fenced as `json`, then any untagged fenced block, then the raw text.

use serde::Deserialize;
use serde_json::Value;

use super::http::preview;
use super::{ProviderError, TranslationResult};
use crate::catalog::{LOCALIZATIONS_KEY, STRING_UNIT_KEY, StringUnit};

/// Opening marker of a fence tagged as JSON.
const JSON_FENCE: &str = "```json\n";
/// Opening marker of an untagged fence.
const PLAIN_FENCE: &str = "```\n";
/// Closing marker of any fence.
const FENCE_END: &str = "\n```";

/// What: Return the text strictly between `start` and the next `end` after it.
///
/// Inputs:
/// - `s`: Source text.
/// - `start`: Opening marker.
/// - `end`: Closing marker.
///
/// Output:
/// - Borrowed interior, or `None` if either marker is missing.
fn between<'a>(s: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let i = s.find(start)? + start.len();
    let j = s[i..].find(end)? + i;
    Some(&s[i..j])
}

/// What: List the parse candidates for a fenced response, in priority order.
///
/// Inputs:
/// - `text`: Raw provider text.
///
/// Output:
/// - JSON-fenced block (if any), untagged fenced block (if any), then `text` itself.
#[must_use]
pub fn candidates(text: &str) -> Vec<&str> {
    let mut out = Vec::with_capacity(3);
    out.extend(between(text, JSON_FENCE, FENCE_END));
    out.extend(between(text, PLAIN_FENCE, FENCE_END));
    out.push(text);
    out
}

/// What: Parse text that must already be a JSON object of entries.
///
/// Inputs:
/// - `text`: Provider text.
///
/// Output:
/// - Validated translation result.
///
/// # Errors
/// - `Payload` if the text is not a JSON object of entries.
/// - `Schema` if a translated unit has an empty value.
pub fn parse_exact(text: &str) -> Result<TranslationResult, ProviderError> {
    let result: TranslationResult =
        serde_json::from_str(text).map_err(|source| ProviderError::Payload {
            source,
            snippet: preview(text),
        })?;
    validate(&result)?;
    Ok(result)
}

/// What: Parse text that may wrap the JSON in a fenced code block.
///
/// Inputs:
/// - `text`: Provider text.
///
/// Output:
/// - Result from the first candidate that parses (see [`candidates`]).
///
/// # Errors
/// - The error of the last candidate when none parse.
/// - `Schema` if the parsed result has a translated unit with an empty value.
pub fn parse_fenced(text: &str) -> Result<TranslationResult, ProviderError> {
    let mut last_err = None;
    for candidate in candidates(text) {
        match serde_json::from_str::<TranslationResult>(candidate) {
            Ok(result) => {
                validate(&result)?;
                return Ok(result);
            }
            Err(source) => {
                last_err = Some(ProviderError::Payload {
                    source,
                    snippet: preview(candidate),
                });
            }
        }
    }
    Err(last_err.unwrap_or(ProviderError::MissingContent("response text")))
}

/// What: Reject results that would break the catalog's translated-value invariant.
///
/// Inputs:
/// - `result`: Parsed entries.
///
/// Output:
/// - `Ok(())` when every `translated` string unit has a non-empty value.
///
/// # Errors
/// - `Schema` naming the first offending key, language and variation path.
/// - `Schema` when `localizations` is present but not an object.
///
/// Details:
/// - Units nested under `variations` (plural, device) and `substitutions` are checked too.
pub fn validate(result: &TranslationResult) -> Result<(), ProviderError> {
    for (key, entry) in result {
        let Some(raw) = entry.fields().get(LOCALIZATIONS_KEY) else {
            continue;
        };
        let Value::Object(locs) = raw else {
            return Err(ProviderError::Schema(format!(
                "\"{key}\" has a non-object {LOCALIZATIONS_KEY} field"
            )));
        };
        for (lang, loc) in locs {
            let mut path = Vec::new();
            if find_empty_translated(loc, &mut path) {
                let at = if path.is_empty() {
                    String::new()
                } else {
                    format!(" at {}", path.join("."))
                };
                return Err(ProviderError::Schema(format!(
                    "\"{key}\" has an empty translated value for {lang}{at}"
                )));
            }
        }
    }
    Ok(())
}

/// What: Search a localization subtree for a translated unit with an empty value.
///
/// Inputs:
/// - `node`: Localization or nested variation object.
/// - `path`: Keys walked so far; left pointing at the offending unit on success.
///
/// Output:
/// - `true` when such a unit exists.
fn find_empty_translated(node: &Value, path: &mut Vec<String>) -> bool {
    let Value::Object(obj) = node else {
        return false;
    };
    for (k, child) in obj {
        if k == STRING_UNIT_KEY {
            let empty = StringUnit::deserialize(child)
                .is_ok_and(|u| u.is_translated() && u.value.is_empty());
            if empty {
                return true;
            }
            continue;
        }
        path.push(k.clone());
        if find_empty_translated(child, path) {
            return true;
        }
        path.pop();
    }
    false
}
