//! Instruction text sent to providers.

use std::fs;
use std::path::Path;

use super::LanguageSet;

/// Token in a prompt template that is replaced with the required languages.
pub const LANGUAGES_PLACEHOLDER: &str = "{{LANGUAGES}}";

/// What: Read an optional prompt template.
///
/// Inputs:
/// - `path`: Template file, usually `.localizable_prompt`.
///
/// Output:
/// - `Some(template)` when the file exists and is readable, `None` otherwise.
///
/// Details:
/// - A read failure is logged and treated like a missing file; it never aborts the run.
#[must_use]
pub fn read_prompt_template(path: &Path) -> Option<String> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "[Config] No prompt template, using default");
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(
                path = %path.display(),
                bytes = text.len(),
                "[Config] Loaded prompt template"
            );
            Some(text)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "[Config] Failed to read prompt template, using default"
            );
            None
        }
    }
}

/// What: Produce the instruction text for a run.
///
/// Inputs:
/// - `template`: Optional user template.
/// - `languages`: Required languages.
///
/// Output:
/// - The template with its first [`LANGUAGES_PLACEHOLDER`] replaced by the comma-joined
///   languages, or [`default_instructions`] when no template is configured.
#[must_use]
pub fn render_instructions(template: Option<&str>, languages: &LanguageSet) -> String {
    template.map_or_else(
        || default_instructions(languages),
        |t| t.replacen(LANGUAGES_PLACEHOLDER, &languages.joined(), 1),
    )
}

/// What: Built-in instruction naming the languages and the expected output shape.
///
/// Inputs:
/// - `languages`: Required languages.
///
/// Output:
/// - Instruction text asking for a JSON object keyed by string key, each value holding a
///   `localizations` map of `{ "stringUnit": { "state": "translated", "value": ... } }`.
#[must_use]
pub fn default_instructions(languages: &LanguageSet) -> String {
    format!(
        r#"You are a translator of software interfaces. The app is a consumer app, so use language that is modern and casual for each locale. Add translations for {langs} languages in the provided JSON structure. Keep existing translations.

Return a valid JSON object with the same keys as the input. Each value must match this format:
{{
  "localizations": {{
    "ar": {{
      "stringUnit": {{
        "state": "translated",
        "value": "Arabic translation"
      }}
    }},
    "de": {{
      "stringUnit": {{
        "state": "translated",
        "value": "German translation"
      }}
    }}
  }}
}}
Include every language listed above for every key."#,
        langs = languages.joined()
    )
}
