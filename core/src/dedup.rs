use crate::index::InvertedIndex;
use crate::DocId;
use std::collections::BTreeSet;

/// Remove documents whose vocabulary (term set, frequencies ignored) equals
/// that of a lower-id document. Returns the removed ids in ascending order.
pub fn remove_duplicates(index: &mut InvertedIndex) -> Vec<DocId> {
    let duplicates: Vec<DocId> = {
        let mut seen: BTreeSet<BTreeSet<&str>> = BTreeSet::new();
        index
            .ids()
            .into_iter()
            .filter(|&doc_id| {
                let vocabulary = index.word_frequencies(doc_id).keys().map(String::as_str).collect();
                !seen.insert(vocabulary)
            })
            .collect()
    };

    for &doc_id in &duplicates {
        tracing::info!(doc_id, "found duplicate document");
        if let Err(e) = index.remove_document(doc_id) {
            tracing::warn!(doc_id, error = %e, "failed to remove duplicate document");
        }
    }
    duplicates
}
