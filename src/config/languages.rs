//! Required-language list loading.

use std::fs;
use std::path::Path;

use super::ConfigError;

/// Ordered, non-empty list of language codes every entry should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet(Vec<String>);

impl LanguageSet {
    /// What: Wrap a list of codes, rejecting an empty list.
    ///
    /// Inputs:
    /// - `codes`: Language codes in configured order.
    ///
    /// Output:
    /// - `Some(LanguageSet)` when at least one code is present, `None` otherwise.
    #[must_use]
    pub fn new(codes: Vec<String>) -> Option<Self> {
        if codes.is_empty() {
            None
        } else {
            Some(Self(codes))
        }
    }

    /// Codes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of required languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty. Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes joined with `", "` for prompts and log lines.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

/// What: Parse a line-delimited language list.
///
/// Inputs:
/// - `text`: File contents.
///
/// Output:
/// - Trimmed codes in file order.
///
/// Details:
/// - Blank lines and lines starting with `#` are skipped.
#[must_use]
pub fn parse_languages(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// What: Read the required languages from `path`.
///
/// Inputs:
/// - `path`: Language list file, usually `.localizable_languages`.
///
/// Output:
/// - Non-empty [`LanguageSet`].
///
/// # Errors
/// - `LanguagesMissing` if the file does not exist.
/// - `LanguagesUnreadable` if it cannot be read.
/// - `LanguagesEmpty` if it holds no codes.
pub fn read_languages(path: &Path) -> Result<LanguageSet, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::LanguagesMissing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::LanguagesUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let set = LanguageSet::new(parse_languages(&text))
        .ok_or_else(|| ConfigError::LanguagesEmpty(path.to_path_buf()))?;
    tracing::debug!(
        path = %path.display(),
        languages = %set.joined(),
        "[Config] Loaded required languages"
    );
    Ok(set)
}
