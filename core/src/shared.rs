use crate::dedup::remove_duplicates;
use crate::document::{DocumentStatus, ScoredDocument};
use crate::error::Result;
use crate::index::{InvertedIndex, TermFreqs};
use crate::ranker::DocumentPredicate;
use crate::DocId;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle for using one index from several threads. Mutations take
/// the write lock, searches and lookups share the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<InvertedIndex>>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }

    pub fn add_document(
        &self,
        doc_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.inner.write().add_document(doc_id, text, status, ratings)
    }

    pub fn remove_document(&self, doc_id: DocId) -> Result<()> {
        self.inner.write().remove_document(doc_id)
    }

    pub fn remove_duplicates(&self) -> Vec<DocId> {
        remove_duplicates(&mut self.inner.write())
    }

    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.inner.read().find_top_documents(raw_query)
    }

    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.inner.read().find_top_documents_with_status(raw_query, status)
    }

    pub fn find_top_k<P: DocumentPredicate>(
        &self,
        raw_query: &str,
        predicate: P,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        self.inner.read().find_top_k(raw_query, predicate, k)
    }

    pub fn find_top_documents_by<P: DocumentPredicate>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>> {
        self.inner.read().find_top_documents_by(raw_query, predicate)
    }

    pub fn match_document(&self, raw_query: &str, doc_id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.inner.read().match_document(raw_query, doc_id)
    }

    pub fn word_frequencies(&self, doc_id: DocId) -> TermFreqs {
        self.inner.read().word_frequencies(doc_id).clone()
    }

    pub fn document_count(&self) -> usize { self.inner.read().document_count() }

    pub fn ids(&self) -> Vec<DocId> { self.inner.read().ids() }

    /// Run `f` against the index under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        f(&self.inner.read())
    }
}
