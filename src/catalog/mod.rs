//! String catalog data model (`.xcstrings`) plus loading, filtering, batching and merging.
//!
//! Entries and top-level metadata are kept as ordered JSON maps so a load/save cycle
//! reproduces every field, null values and key order included. The few fields the
//! pipeline reads are exposed through accessors.

pub mod batch;
pub mod filter;
pub mod merge;
pub mod store;

use indexmap::IndexMap;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub use batch::{Batch, partition, preview};
pub use filter::{missing_languages, select_incomplete};
pub use merge::{MergeStats, merge_translations};
pub use store::{CatalogError, load, save};

/// Ordered mapping of string key to entry, as stored under `strings`.
pub type Strings = IndexMap<String, Entry>;

/// State tag written for machine translations.
pub const STATE_TRANSLATED: &str = "translated";

/// Top-level key holding the entries.
const STRINGS_KEY: &str = "strings";
/// Top-level key holding the development language.
const SOURCE_LANGUAGE_KEY: &str = "sourceLanguage";
/// Top-level key holding the format version.
const VERSION_KEY: &str = "version";
/// Entry key holding per-language translations.
pub const LOCALIZATIONS_KEY: &str = "localizations";
/// Localization key holding a plain translation.
pub const STRING_UNIT_KEY: &str = "stringUnit";

/// The whole string catalog document.
///
/// `fields` always holds a `strings` slot marking where the entries are written; its
/// value is a placeholder and the entries themselves live in [`Catalog::strings`].
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Top-level fields in stored order.
    fields: Map<String, Value>,
    /// All entries keyed by their string key.
    pub strings: Strings,
}

impl Catalog {
    /// What: Build an empty catalog with the given version tag.
    ///
    /// Inputs:
    /// - `version`: Format version string.
    ///
    /// Output:
    /// - Catalog holding only `strings` and `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(STRINGS_KEY.to_string(), Value::Null);
        fields.insert(VERSION_KEY.to_string(), Value::String(version.into()));
        Self {
            fields,
            strings: Strings::new(),
        }
    }

    /// Number of entries in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Development language, e.g. `"en"`.
    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.fields.get(SOURCE_LANGUAGE_KEY).and_then(Value::as_str)
    }

    /// Format version tag, e.g. `"1.0"`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.fields.get(VERSION_KEY).and_then(Value::as_str)
    }

    /// What: Set the development language.
    ///
    /// Inputs:
    /// - `lang`: Language code.
    ///
    /// Output:
    /// - None; an existing value is replaced in place, a new one goes first.
    pub fn set_source_language(&mut self, lang: &str) {
        let value = Value::from(lang);
        if let Some(slot) = self.fields.get_mut(SOURCE_LANGUAGE_KEY) {
            *slot = value;
            return;
        }
        let mut fields = Map::new();
        fields.insert(SOURCE_LANGUAGE_KEY.to_string(), value);
        fields.extend(std::mem::take(&mut self.fields));
        self.fields = fields;
    }

    /// Raw top-level field other than `strings`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        if key == STRINGS_KEY {
            return None;
        }
        self.fields.get(key)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            if key == STRINGS_KEY {
                map.serialize_entry(key, &self.strings)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::deserialize(deserializer)?;
        let raw = fields
            .get_mut(STRINGS_KEY)
            .map(Value::take)
            .ok_or_else(|| D::Error::missing_field(STRINGS_KEY))?;
        let strings = Strings::deserialize(raw).map_err(D::Error::custom)?;
        Ok(Self { fields, strings })
    }
}

/// One translatable string: all of its fields, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Map<String, Value>);

impl Entry {
    /// All fields of the entry.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Developer comment shown to translators.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.0.get("comment").and_then(Value::as_str)
    }

    /// Translations keyed by language code, when present as an object.
    #[must_use]
    pub fn localizations(&self) -> Option<&Map<String, Value>> {
        self.0.get(LOCALIZATIONS_KEY).and_then(Value::as_object)
    }

    /// What: Count the language codes present in this entry's localizations.
    ///
    /// Inputs:
    /// - None.
    ///
    /// Output:
    /// - Number of localization keys; `0` when the mapping is absent.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.localizations().map_or(0, Map::len)
    }

    /// Whether a localization exists for `lang`.
    #[must_use]
    pub fn has_language(&self, lang: &str) -> bool {
        self.localizations().is_some_and(|l| l.contains_key(lang))
    }

    /// Plain string unit for `lang`, if it has one.
    #[must_use]
    pub fn string_unit(&self, lang: &str) -> Option<StringUnit> {
        let unit = self.localizations()?.get(lang)?.get(STRING_UNIT_KEY)?;
        StringUnit::deserialize(unit).ok()
    }

    /// Set a field, keeping its position when it already exists.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// What: Insert or replace the plain string unit for `lang`.
    ///
    /// Inputs:
    /// - `lang`: Language code.
    /// - `state`: State tag, usually [`STATE_TRANSLATED`].
    /// - `value`: Translated text.
    ///
    /// Output:
    /// - Returns `self` for chaining.
    #[must_use]
    pub fn with_unit(mut self, lang: &str, state: &str, value: &str) -> Self {
        let slot = self
            .0
            .entry(LOCALIZATIONS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(locs) = slot {
            locs.insert(
                lang.to_string(),
                json!({ STRING_UNIT_KEY: { "state": state, "value": value } }),
            );
        }
        self
    }
}

/// A single translated value and its review state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StringUnit {
    /// Review state such as `translated` or `needs_review`.
    pub state: String,
    /// The translated text; empty when absent.
    #[serde(default)]
    pub value: String,
}

impl StringUnit {
    /// Whether this unit is marked translated.
    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.state == STATE_TRANSLATED
    }
}
