//! Run configuration: required languages, prompt template, credential and paths.
//!
//! Everything environment- or working-directory-dependent is resolved once into
//! [`Settings`]; the pipeline never looks anything up on its own.

pub mod languages;
pub mod prompt;
pub mod settings;

use std::fmt;
use std::path::PathBuf;

pub use languages::{LanguageSet, parse_languages, read_languages};
pub use prompt::{
    LANGUAGES_PLACEHOLDER, default_instructions, read_prompt_template, render_instructions,
};
pub use settings::Settings;

/// Default file holding the required language codes, one per line.
pub const LANGUAGES_FILE: &str = ".localizable_languages";
/// Default file holding an optional prompt template.
pub const PROMPT_FILE: &str = ".localizable_prompt";

/// What: Pre-flight configuration failures.
///
/// Inputs: Produced while building [`Settings`].
///
/// Output: Implements `Display`/`Error`; every variant is fatal before any network call.
#[derive(Debug)]
pub enum ConfigError {
    /// Provider name is not one of the supported backends.
    UnsupportedProvider(String),
    /// Language list file does not exist.
    LanguagesMissing(PathBuf),
    /// Language list file exists but cannot be read.
    LanguagesUnreadable {
        /// Language list path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Language list contains no codes.
    LanguagesEmpty(PathBuf),
    /// Credential environment variable is unset or empty.
    MissingCredential {
        /// Name of the environment variable consulted.
        var: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedProvider(name) => write!(
                f,
                "unsupported provider '{name}' (expected one of: openai, anthropic, gemini)"
            ),
            Self::LanguagesMissing(path) => {
                write!(f, "{} file does not exist", path.display())
            }
            Self::LanguagesUnreadable { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::LanguagesEmpty(path) => {
                write!(f, "no languages specified in {}", path.display())
            }
            Self::MissingCredential { var } => {
                write!(f, "{var} environment variable is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LanguagesUnreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}
