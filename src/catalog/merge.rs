//! Upserting provider results into the catalog.

use super::{Catalog, Strings};

/// Counts describing what a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Keys that already existed and were replaced.
    pub replaced: usize,
    /// Keys that were new to the catalog.
    pub added: usize,
}

/// What: Upsert translated entries into the catalog by key.
///
/// Inputs:
/// - `catalog`: Catalog to mutate.
/// - `translated`: Entries returned by a provider.
///
/// Output:
/// - [`MergeStats`] with replaced and added counts.
///
/// Details:
/// - A returned entry replaces the stored entry for its key wholesale.
/// - Keys absent from `translated` are left untouched, metadata included.
/// - New keys are appended at the end of the catalog; existing keys keep their position.
/// - Merging the same result twice gives the same catalog as merging it once.
pub fn merge_translations(catalog: &mut Catalog, translated: Strings) -> MergeStats {
    let mut stats = MergeStats::default();
    for (key, entry) in translated {
        if catalog.strings.insert(key, entry).is_some() {
            stats.replaced += 1;
        } else {
            stats.added += 1;
        }
    }
    stats
}
