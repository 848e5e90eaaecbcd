//! Selection of entries that still need translations.

use super::{Catalog, Entry};

/// What: Select the entries whose localization count is below the required language count.
///
/// Inputs:
/// - `catalog`: Loaded catalog.
/// - `languages`: Required language codes for this run.
///
/// Output:
/// - `(key, entry)` pairs in catalog order.
///
/// Details:
/// - Compares counts only, not language sets: an entry holding translations for languages
///   outside `languages` can count as complete while still missing a required one.
/// - Entries with an empty key are skipped.
#[must_use]
pub fn select_incomplete(catalog: &Catalog, languages: &[String]) -> Vec<(String, Entry)> {
    let required = languages.len();
    catalog
        .strings
        .iter()
        .filter(|(key, entry)| !key.is_empty() && entry.language_count() < required)
        .map(|(key, entry)| (key.clone(), entry.clone()))
        .collect()
}

/// What: List the required languages an entry has no localization for.
///
/// Inputs:
/// - `entry`: Entry to inspect.
/// - `languages`: Required language codes.
///
/// Output:
/// - Missing codes in `languages` order.
///
/// Details:
/// - Diagnostic only; selection uses [`select_incomplete`].
#[must_use]
pub fn missing_languages<'a>(entry: &Entry, languages: &'a [String]) -> Vec<&'a str> {
    languages
        .iter()
        .filter(|lang| !entry.has_language(lang))
        .map(String::as_str)
        .collect()
}
