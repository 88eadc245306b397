//! TF-IDF ranking over an [`InvertedIndex`].
//!
//! Relevance of a document is the sum of `tf * idf` over the plus terms it
//! contains. Any minus term in a document removes it from the results no
//! matter what the predicate says. Results are sorted by relevance
//! descending; relevance values within `relevance_epsilon` of each other are
//! ordered by rating descending.

use crate::document::{DocumentStatus, ScoredDocument};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::DocId;
use std::collections::BTreeMap;

/// Filter applied to every candidate before it is scored.
pub trait DocumentPredicate {
    fn matches(&self, doc_id: DocId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentPredicate for F
where
    F: Fn(DocId, DocumentStatus, i32) -> bool,
{
    fn matches(&self, doc_id: DocId, status: DocumentStatus, rating: i32) -> bool {
        self(doc_id, status, rating)
    }
}

/// A bare status matches documents with exactly that status.
impl DocumentPredicate for DocumentStatus {
    fn matches(&self, _doc_id: DocId, status: DocumentStatus, _rating: i32) -> bool {
        *self == status
    }
}

/// Sort by relevance descending. Neighbours closer than `epsilon` form a
/// cluster (chains included), and each cluster is ordered by rating
/// descending. Both passes use total orders.
pub fn sort_scored(docs: &mut [ScoredDocument], epsilon: f64) {
    docs.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    let mut cluster = 0usize;
    let mut keyed: Vec<(usize, ScoredDocument)> = Vec::with_capacity(docs.len());
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 && (docs[i - 1].relevance - doc.relevance).abs() >= epsilon {
            cluster += 1;
        }
        keyed.push((cluster, *doc));
    }
    keyed.sort_by(|(ca, a), (cb, b)| ca.cmp(cb).then_with(|| b.rating.cmp(&a.rating)));

    for (slot, (_, doc)) in docs.iter_mut().zip(keyed) {
        *slot = doc;
    }
}

impl InvertedIndex {
    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_by(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_by(raw_query, status)
    }

    pub fn find_top_documents_by<P: DocumentPredicate>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_k(raw_query, predicate, self.config.max_results)
    }

    pub fn find_top_k<P: DocumentPredicate>(
        &self,
        raw_query: &str,
        predicate: P,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(&query, &predicate);
        sort_scored(&mut matched, self.config.relevance_epsilon);
        let total_hits = matched.len();
        matched.truncate(k);
        tracing::debug!(
            query = raw_query,
            plus = query.plus.len(),
            minus = query.minus.len(),
            total_hits,
            returned = matched.len(),
            "ranked documents"
        );
        Ok(matched)
    }

    fn find_all_documents<P: DocumentPredicate>(
        &self,
        query: &Query,
        predicate: &P,
    ) -> Vec<ScoredDocument> {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for term in &query.plus {
            let (Some(plist), Some(idf)) =
                (self.postings.get(term), self.inverse_document_frequency(term))
            else {
                continue;
            };
            for (&doc_id, &tf) in plist {
                let meta = &self.docs[&doc_id];
                if predicate.matches(doc_id, meta.status, meta.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }

        for term in &query.minus {
            if let Some(plist) = self.postings.get(term) {
                for doc_id in plist.keys() {
                    relevance.remove(doc_id);
                }
            }
        }

        relevance
            .into_iter()
            .map(|(id, relevance)| ScoredDocument { id, relevance, rating: self.docs[&id].rating })
            .collect()
    }
}
