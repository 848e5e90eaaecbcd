//! Crate-level error type returned to the binary.

use std::fmt;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::providers::ProviderError;

/// What: Union of the failures that end a run before or outside the batch loop.
///
/// Inputs: Converted from the module error types with `?`.
///
/// Output: Implements `Display`/`Error`; every variant maps to exit status 1.
///
/// Details:
/// - Per-batch provider failures never reach this type; they are logged and counted.
#[derive(Debug)]
pub enum Error {
    /// Invalid or missing configuration.
    Config(ConfigError),
    /// Catalog could not be loaded.
    Catalog(CatalogError),
    /// Provider could not be set up.
    Runtime(ProviderError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Catalog(err) => write!(f, "catalog error: {err}"),
            Self::Runtime(err) => write!(f, "provider error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<CatalogError> for Error {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ProviderError> for Error {
    fn from(value: ProviderError) -> Self {
        Self::Runtime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    /// What: Wrapped errors keep their message and expose themselves as the source.
    ///
    /// Inputs:
    /// - `ConfigError::MissingCredential` converted with `From`.
    ///
    /// Output:
    /// - Prefixed message and a source whose message is the inner one.
    fn config_error_wraps() {
        let err: Error = ConfigError::MissingCredential {
            var: "OPENAI_API_KEY".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "configuration error: OPENAI_API_KEY environment variable is not set"
        );
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("OPENAI_API_KEY environment variable is not set")
        );
    }
}
