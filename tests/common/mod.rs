//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use zeroize::Zeroizing;

use xcstrings_translate::catalog::{self, Batch, Catalog, Entry, STATE_TRANSLATED};
use xcstrings_translate::config::{LanguageSet, Settings};
use xcstrings_translate::providers::{
    ProviderConfig, ProviderError, ProviderKind, TranslationProvider, TranslationResult,
};

/// Languages required by the fixtures.
pub const LANGS: [&str; 2] = ["de", "fr"];

/// Per-batch behaviour of a [`ScriptedProvider`].
pub type Script = Box<dyn Fn(&Batch) -> Result<TranslationResult, ProviderError> + Send + Sync>;

/// Provider whose answers come from a closure; records every batch it receives.
pub struct ScriptedProvider {
    /// Answer for each batch.
    script: Script,
    /// Keys of each batch received, in call order.
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProvider {
    /// Wrap a script.
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Batch) -> Result<TranslationResult, ProviderError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that translates every entry into all [`LANGS`].
    pub fn translating() -> Self {
        Self::new(|batch| Ok(translate(batch)))
    }

    /// Recorded batch sizes.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(Vec::len)
            .collect()
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn translate_batch(
        &self,
        batch: &Batch,
        _languages: &LanguageSet,
        _instructions: &str,
    ) -> Result<TranslationResult, ProviderError> {
        self.calls
            .lock()
            .expect("lock")
            .push(batch.keys().map(ToString::to_string).collect());
        (self.script)(batch)
    }
}

/// Fill every entry of `batch` with a translated unit per required language.
pub fn translate(batch: &Batch) -> TranslationResult {
    batch
        .entries
        .iter()
        .map(|(key, entry)| {
            let mut out = entry.clone();
            for lang in LANGS {
                out = out.with_unit(lang, STATE_TRANSLATED, &format!("{lang}:{key}"));
            }
            (key.clone(), out)
        })
        .collect()
}

/// Catalog with `n` untranslated entries `key00..`.
pub fn untranslated_catalog(n: usize) -> Catalog {
    let mut c = Catalog::new("1.0");
    c.set_source_language("en");
    for i in 0..n {
        c.strings.insert(format!("key{i:02}"), Entry::default());
    }
    c
}

/// Write `catalog` to `dir/Localizable.xcstrings` and return the path.
pub fn write_input(dir: &Path, catalog: &Catalog) -> PathBuf {
    let path = dir.join("Localizable.xcstrings");
    catalog::save(catalog, &path).expect("seed catalog");
    path
}

/// Settings for a run over `input` writing to `output`.
pub fn settings(input: PathBuf, output: PathBuf, batch_size: usize, dry_run: bool) -> Settings {
    Settings {
        provider: ProviderKind::OpenAi,
        provider_config: ProviderConfig::for_kind(ProviderKind::OpenAi, None),
        api_key: Zeroizing::new("sk-test".into()),
        languages: LanguageSet::new(LANGS.iter().map(ToString::to_string).collect())
            .expect("languages"),
        prompt_template: None,
        input,
        output,
        batch_size: NonZeroUsize::new(batch_size).expect("non-zero"),
        dry_run,
        verbose: false,
    }
}
