//! Partitioning of incomplete entries into provider-sized batches.

use std::num::NonZeroUsize;

use indexmap::IndexMap;

use super::Entry;

/// An ordered group of entries sent to a provider in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based position of this batch within the run.
    pub index: usize,
    /// Entries in catalog order.
    pub entries: Vec<(String, Entry)>,
}

impl Batch {
    /// Number of entries in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of the batch entries, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// What: View the batch as a key → entry object for the provider payload.
    ///
    /// Inputs:
    /// - None.
    ///
    /// Output:
    /// - Ordered map borrowing the batch entries.
    #[must_use]
    pub fn as_object(&self) -> IndexMap<&str, &Entry> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e)).collect()
    }

    /// What: Render the batch as pretty JSON, as embedded in provider prompts.
    ///
    /// Inputs:
    /// - None.
    ///
    /// Output:
    /// - Two-space indented JSON object of the batch entries.
    ///
    /// # Errors
    /// - Returns the `serde_json` error if an entry cannot be serialized.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.as_object())
    }
}

/// What: Split entries into consecutive batches of `size`.
///
/// Inputs:
/// - `entries`: Incomplete entries in catalog order.
/// - `size`: Maximum entries per batch.
///
/// Output:
/// - Batches numbered from 1; all hold `size` entries except possibly the last.
///
/// Details:
/// - Concatenating the batches gives back `entries` unchanged.
#[must_use]
pub fn partition(entries: Vec<(String, Entry)>, size: NonZeroUsize) -> Vec<Batch> {
    let size = size.get();
    let mut batches = Vec::with_capacity(entries.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(entries.len()));
    for item in entries {
        current.push(item);
        if current.len() == size {
            batches.push(Batch {
                index: batches.len() + 1,
                entries: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        batches.push(Batch {
            index: batches.len() + 1,
            entries: current,
        });
    }
    batches
}

/// What: Build the single-entry batch used for dry-run previews.
///
/// Inputs:
/// - `entries`: Incomplete entries in catalog order.
///
/// Output:
/// - `Some(batch)` holding only the first entry, or `None` when there is nothing to preview.
#[must_use]
pub fn preview(entries: Vec<(String, Entry)>) -> Option<Batch> {
    entries.into_iter().next().map(|first| Batch {
        index: 1,
        entries: vec![first],
    })
}
