//! Content statistics: pure reductions over the content store.
//!
//! Everything here is a side-effect-free fold — no I/O, no state. The home
//! page stats section and the `stats` CLI command are the consumers.

use crate::store::{Category, ContentRecord, ContentStore};

/// Total record count for one category, including nested topic groupings.
pub fn category_record_count(category: &Category) -> usize {
    category.records.len()
        + category
            .topics
            .iter()
            .map(|t| t.records.len())
            .sum::<usize>()
}

/// Total record count across the whole store. Empty store yields zero.
pub fn record_count(store: &ContentStore) -> usize {
    store.categories.iter().map(category_record_count).sum()
}

/// All featured records in store order (direct records first, then topic
/// records, per category).
pub fn featured(store: &ContentStore) -> Vec<&ContentRecord> {
    store
        .categories
        .iter()
        .flat_map(|c| {
            c.records
                .iter()
                .chain(c.topics.iter().flat_map(|t| t.records.iter()))
        })
        .filter(|r| r.featured)
        .collect()
}

/// Pluralized note count for display: `"1 note"`, `"8 notes"`.
pub fn note_count_label(count: usize) -> String {
    if count == 1 {
        "1 note".to_string()
    } else {
        format!("{} notes", count)
    }
}
