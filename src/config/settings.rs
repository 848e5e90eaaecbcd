//! Resolved per-run settings.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{ConfigError, LanguageSet, read_languages, read_prompt_template, render_instructions};
use crate::args::{Args, output_path};
use crate::providers::{ProviderConfig, ProviderKind};

/// Everything a run needs, resolved once from arguments, files and environment.
pub struct Settings {
    /// Selected backend.
    pub provider: ProviderKind,
    /// Model, endpoint and timeout for the backend.
    pub provider_config: ProviderConfig,
    /// Backend credential.
    pub api_key: Zeroizing<String>,
    /// Languages every entry must cover.
    pub languages: LanguageSet,
    /// Optional user prompt template.
    pub prompt_template: Option<String>,
    /// Catalog to read.
    pub input: PathBuf,
    /// Catalog to write (checkpoints and final save).
    pub output: PathBuf,
    /// Entries per provider request.
    pub batch_size: NonZeroUsize,
    /// Preview a single entry without writing.
    pub dry_run: bool,
    /// Show progress and narration.
    pub verbose: bool,
}

impl Settings {
    /// What: Resolve settings from parsed arguments.
    ///
    /// Inputs:
    /// - `args`: Parsed command line.
    /// - `provider`: Backend already validated from `args.provider`.
    /// - `lookup`: Environment lookup (`std::env::var` in production).
    /// - `now`: Timestamp for the derived output name.
    ///
    /// Output:
    /// - Fully resolved [`Settings`].
    ///
    /// # Errors
    /// - `MissingCredential` if the backend's key is unset or blank.
    /// - Any language-file error from [`read_languages`].
    ///
    /// Details:
    /// - The credential is checked before the language file.
    /// - A prompt template that fails to load falls back to the default instructions.
    pub fn resolve<F>(
        args: &Args,
        provider: ProviderKind,
        lookup: F,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = provider.credential_var();
        let api_key = lookup(var)
            .filter(|v| !v.trim().is_empty())
            .map(Zeroizing::new)
            .ok_or_else(|| ConfigError::MissingCredential {
                var: var.to_string(),
            })?;
        let languages = read_languages(&args.languages_file)?;
        let prompt_template = read_prompt_template(&args.prompt_file);
        let settings = Self {
            provider,
            provider_config: ProviderConfig::for_kind(provider, args.model_id.as_deref()),
            api_key,
            languages,
            prompt_template,
            input: args.input.clone(),
            output: output_path(args, now),
            batch_size: args.chunk_size,
            dry_run: args.dry_run,
            verbose: args.verbose,
        };
        tracing::debug!(settings = ?settings, "[Config] Resolved settings");
        Ok(settings)
    }

    /// Instruction text for this run.
    #[must_use]
    pub fn instructions(&self) -> String {
        render_instructions(self.prompt_template.as_deref(), &self.languages)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("provider_config", &self.provider_config)
            .field("api_key", &"<redacted>")
            .field("languages", &self.languages)
            .field("prompt_template", &self.prompt_template.is_some())
            .field("input", &self.input)
            .field("output", &self.output)
            .field("batch_size", &self.batch_size)
            .field("dry_run", &self.dry_run)
            .field("verbose", &self.verbose)
            .finish()
    }
}
