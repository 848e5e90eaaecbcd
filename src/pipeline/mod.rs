//! Run controller: load, filter, translate batch by batch, checkpoint, save.
//!
//! Batches run strictly in sequence. A failing batch is logged and skipped; the catalog is
//! saved to the output path after every batch so an interrupted run loses at most the
//! batch in flight.

pub mod progress;

use std::path::PathBuf;

use crate::catalog::{
    self, Batch, Catalog, Entry, merge_translations, missing_languages, partition,
    select_incomplete,
};
use crate::config::Settings;
use crate::error::Error;
use crate::providers::{ProviderError, TranslationProvider, TranslationResult};

pub use progress::{ConsoleProgress, NoProgress, ProgressReporter};

/// Counters for a completed batch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Batches attempted.
    pub batches: usize,
    /// Batches whose result was merged.
    pub succeeded: usize,
    /// Batches that failed and were skipped.
    pub failed: usize,
    /// Checkpoint saves that failed.
    pub checkpoint_failures: usize,
    /// Whether the final save succeeded.
    pub final_save_ok: bool,
    /// Where the catalog was written.
    pub output_path: PathBuf,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every entry already covers the required languages; nothing was written.
    NothingToTranslate,
    /// Dry run: the single-entry preview result, printed and not written.
    Previewed(TranslationResult),
    /// Dry run: the preview call failed; nothing was written.
    PreviewFailed(ProviderError),
    /// Batch loop ran to the end.
    Completed(RunSummary),
}

/// Drives one translation run over a catalog.
pub struct Pipeline<'a> {
    /// Resolved run settings.
    settings: &'a Settings,
    /// Backend used for every batch.
    provider: &'a dyn TranslationProvider,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `settings` using `provider`.
    #[must_use]
    pub fn new(settings: &'a Settings, provider: &'a dyn TranslationProvider) -> Self {
        Self { settings, provider }
    }

    /// What: Execute the run.
    ///
    /// Inputs:
    /// - `reporter`: Receives progress for the batch loop.
    ///
    /// Output:
    /// - [`RunOutcome`] describing how the run ended.
    ///
    /// # Errors
    /// - `Error::Catalog` if the input catalog cannot be read or parsed.
    ///
    /// Details:
    /// - Provider failures and checkpoint save failures never abort the run.
    pub async fn run(&self, reporter: &mut dyn ProgressReporter) -> Result<RunOutcome, Error> {
        let settings = self.settings;
        tracing::info!(
            input = %settings.input.display(),
            provider = self.provider.name(),
            model = %settings.provider_config.model,
            languages = %settings.languages.joined(),
            "[Pipeline] Loading catalog"
        );
        let mut catalog = catalog::load(&settings.input)?;
        let incomplete = select_incomplete(&catalog, settings.languages.as_slice());
        if incomplete.is_empty() {
            tracing::info!(
                entries = catalog.len(),
                "[Pipeline] Nothing to translate, all entries cover the required languages"
            );
            return Ok(RunOutcome::NothingToTranslate);
        }
        tracing::info!(
            incomplete = incomplete.len(),
            entries = catalog.len(),
            "[Pipeline] Selected entries needing translation"
        );

        let instructions = settings.instructions();
        if settings.dry_run {
            return Ok(self.preview(incomplete, &instructions).await);
        }

        let summary = self
            .translate_all(&mut catalog, incomplete, &instructions, reporter)
            .await;
        Ok(RunOutcome::Completed(summary))
    }

    /// Translate the first incomplete entry and print the result.
    async fn preview(&self, incomplete: Vec<(String, Entry)>, instructions: &str) -> RunOutcome {
        let Some(batch) = catalog::preview(incomplete) else {
            return RunOutcome::NothingToTranslate;
        };
        self.log_batch(&batch, 1);
        match self
            .provider
            .translate_batch(&batch, &self.settings.languages, instructions)
            .await
        {
            Ok(result) => {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!(error = %e, "[Pipeline] Failed to render preview"),
                }
                tracing::info!("[Pipeline] Dry run complete, nothing written");
                RunOutcome::Previewed(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "[Pipeline] Preview translation failed");
                RunOutcome::PreviewFailed(e)
            }
        }
    }

    /// Run every batch in order, merging successes and checkpointing after each.
    async fn translate_all(
        &self,
        catalog: &mut Catalog,
        incomplete: Vec<(String, Entry)>,
        instructions: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> RunSummary {
        let settings = self.settings;
        let total = incomplete.len();
        let batches = partition(incomplete, settings.batch_size);
        let mut summary = RunSummary {
            batches: batches.len(),
            succeeded: 0,
            failed: 0,
            checkpoint_failures: 0,
            final_save_ok: false,
            output_path: settings.output.clone(),
        };
        tracing::info!(
            batches = batches.len(),
            batch_size = settings.batch_size.get(),
            output = %settings.output.display(),
            "[Pipeline] Starting batch loop"
        );

        reporter.start(total);
        for batch in &batches {
            self.log_batch(batch, summary.batches);
            match self
                .provider
                .translate_batch(batch, &settings.languages, instructions)
                .await
            {
                Ok(result) => {
                    let stats = merge_translations(catalog, result);
                    summary.succeeded += 1;
                    tracing::debug!(
                        batch = batch.index,
                        replaced = stats.replaced,
                        added = stats.added,
                        "[Pipeline] Merged batch"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        batch = batch.index,
                        of = summary.batches,
                        error = %e,
                        "[Pipeline] Batch failed, continuing"
                    );
                }
            }
            if let Err(e) = catalog::save(catalog, &settings.output) {
                summary.checkpoint_failures += 1;
                tracing::warn!(
                    batch = batch.index,
                    error = %e,
                    "[Pipeline] Checkpoint save failed"
                );
            }
            reporter.advance(batch.len());
        }
        reporter.finish();

        match catalog::save(catalog, &settings.output) {
            Ok(()) => {
                summary.final_save_ok = true;
                tracing::info!(
                    path = %settings.output.display(),
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    "[Pipeline] Translation complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "[Pipeline] Final save failed");
            }
        }
        summary
    }

    /// Narrate a batch about to be sent.
    fn log_batch(&self, batch: &Batch, of: usize) {
        tracing::info!(
            batch = batch.index,
            of,
            entries = batch.len(),
            "[Pipeline] Translating batch"
        );
        let languages = self.settings.languages.as_slice();
        for (key, entry) in &batch.entries {
            tracing::debug!(
                batch = batch.index,
                key = %key,
                missing = ?missing_languages(entry, languages),
                "[Pipeline] Entry queued"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use zeroize::Zeroizing;

    use crate::catalog::STATE_TRANSLATED;
    use crate::config::LanguageSet;
    use crate::providers::{ProviderConfig, ProviderKind};

    /// Provider that translates every entry into `fr` and records batch sizes.
    struct EchoProvider {
        /// Sizes of the batches received, in order.
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl TranslationProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn translate_batch(
            &self,
            batch: &Batch,
            _languages: &LanguageSet,
            _instructions: &str,
        ) -> Result<TranslationResult, ProviderError> {
            self.seen.lock().expect("lock").push(batch.len());
            Ok(batch
                .entries
                .iter()
                .map(|(k, e)| {
                    (
                        k.clone(),
                        e.clone().with_unit("fr", STATE_TRANSLATED, &format!("fr:{k}")),
                    )
                })
                .collect())
        }
    }

    /// Settings reading `input` and writing `output` with one required language.
    fn settings(input: PathBuf, output: PathBuf, batch: usize, dry_run: bool) -> Settings {
        Settings {
            provider: ProviderKind::OpenAi,
            provider_config: ProviderConfig::for_kind(ProviderKind::OpenAi, None),
            api_key: Zeroizing::new("test".into()),
            languages: LanguageSet::new(vec!["fr".into()]).expect("languages"),
            prompt_template: None,
            input,
            output,
            batch_size: NonZeroUsize::new(batch).expect("non-zero"),
            dry_run,
            verbose: false,
        }
    }

    #[tokio::test]
    /// What: Three entries with batch size 2 run as two batches and all get merged.
    ///
    /// Inputs:
    /// - Catalog with three untranslated entries.
    ///
    /// Output:
    /// - Batch sizes [2, 1]; every entry has `fr` in the saved output.
    async fn batches_are_merged_and_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.xcstrings");
        let output = dir.path().join("out.xcstrings");
        let mut cat = Catalog::new("1.0");
        for k in ["A", "B", "C"] {
            cat.strings.insert(k.into(), Entry::default());
        }
        catalog::save(&cat, &input).expect("seed");

        let provider = EchoProvider {
            seen: Mutex::new(Vec::new()),
        };
        let s = settings(input, output.clone(), 2, false);
        let outcome = Pipeline::new(&s, &provider)
            .run(&mut NoProgress)
            .await
            .expect("run");
        let summary = match outcome {
            RunOutcome::Completed(summary) => summary,
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!((summary.batches, summary.succeeded, summary.failed), (2, 2, 0));
        assert!(summary.final_save_ok);
        assert_eq!(*provider.seen.lock().expect("lock"), vec![2, 1]);

        let saved = catalog::load(&output).expect("output");
        assert!(saved.strings.values().all(|e| e.has_language("fr")));
    }

    #[tokio::test]
    /// What: A missing input catalog is a fatal catalog error.
    ///
    /// Inputs:
    /// - Nonexistent input path.
    ///
    /// Output:
    /// - `Error::Catalog` with a read failure; no output written.
    async fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("out.xcstrings");
        let provider = EchoProvider {
            seen: Mutex::new(Vec::new()),
        };
        let s = settings(dir.path().join("missing.xcstrings"), output.clone(), 10, false);
        let err = Pipeline::new(&s, &provider)
            .run(&mut NoProgress)
            .await
            .expect_err("missing input");
        assert!(matches!(err, Error::Catalog(ref e) if e.is_read()));
        assert!(!output.exists());
        assert!(fs::read_dir(dir.path()).expect("dir").next().is_none());
    }
}
