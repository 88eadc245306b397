use crate::config::SearchConfig;
use crate::document::DocumentStatus;
use crate::error::{Error, Result};
use crate::query::{parse_query, Query};
use crate::tokenizer::{is_valid_word, StopWords};
use crate::DocId;
use std::collections::BTreeMap;

/// Term frequencies of one document: term -> share of its non-stop tokens.
pub type TermFreqs = BTreeMap<String, f64>;

static EMPTY_FREQS: TermFreqs = BTreeMap::new();

/// Per-document record. Immutable once added; update is remove + add.
#[derive(Debug, Clone, PartialEq)]
pub struct DocMeta {
    pub status: DocumentStatus,
    pub rating: i32,
    pub term_freqs: TermFreqs,
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub(crate) config: SearchConfig,
    stop_words: StopWords,
    /// term -> doc -> tf. Every doc listed here is in `docs` and lists the term.
    pub(crate) postings: BTreeMap<String, BTreeMap<DocId, f64>>,
    pub(crate) docs: BTreeMap<DocId, DocMeta>,
}

/// Integer mean truncated toward zero; empty ratings give 0.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

impl InvertedIndex {
    pub fn new(stop_words: StopWords) -> Self {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Self {
        Self { config, stop_words, postings: BTreeMap::new(), docs: BTreeMap::new() }
    }

    /// Build an index whose stop words come from space-delimited text.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::new(StopWords::from_text(text)?))
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn add_document(
        &mut self,
        doc_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if doc_id < 0 {
            return Err(Error::InvalidId(doc_id));
        }
        if self.docs.contains_key(&doc_id) {
            return Err(Error::DuplicateId(doc_id));
        }
        if !is_valid_word(text) {
            return Err(Error::InvalidContent);
        }

        let words = self.stop_words.split_no_stop(text);
        let mut term_freqs = TermFreqs::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in &words {
                *term_freqs.entry((*word).to_string()).or_insert(0.0) += inv_word_count;
            }
        }
        for (term, &tf) in &term_freqs {
            self.postings.entry(term.clone()).or_default().insert(doc_id, tf);
        }

        let rating = average_rating(ratings);
        tracing::debug!(doc_id, terms = term_freqs.len(), rating, %status, "added document");
        self.docs.insert(doc_id, DocMeta { status, rating, term_freqs });
        Ok(())
    }

    /// Remove a document and its postings. Only the terms the document
    /// itself lists are visited.
    pub fn remove_document(&mut self, doc_id: DocId) -> Result<()> {
        let meta = self.docs.remove(&doc_id).ok_or(Error::NotFound(doc_id))?;
        for term in meta.term_freqs.keys() {
            if let Some(plist) = self.postings.get_mut(term) {
                plist.remove(&doc_id);
                if plist.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        tracing::debug!(doc_id, "removed document");
        Ok(())
    }

    /// Stored term frequencies for a document, empty if the id is unknown.
    pub fn word_frequencies(&self, doc_id: DocId) -> &TermFreqs {
        self.docs.get(&doc_id).map(|m| &m.term_freqs).unwrap_or(&EMPTY_FREQS)
    }

    pub fn document_count(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn contains(&self, doc_id: DocId) -> bool { self.docs.contains_key(&doc_id) }

    /// Snapshot of live ids in ascending order, safe to hold across removals.
    pub fn ids(&self) -> Vec<DocId> { self.docs.keys().copied().collect() }

    pub fn status(&self, doc_id: DocId) -> Option<DocumentStatus> {
        self.docs.get(&doc_id).map(|m| m.status)
    }

    pub fn rating(&self, doc_id: DocId) -> Option<i32> {
        self.docs.get(&doc_id).map(|m| m.rating)
    }

    /// `ln(N / df)`, or `None` when no document contains the term.
    pub fn inverse_document_frequency(&self, term: &str) -> Option<f64> {
        let df = self.postings.get(term).map_or(0, BTreeMap::len);
        if df == 0 {
            return None;
        }
        Some((self.docs.len() as f64 / df as f64).ln())
    }

    pub fn parse_query(&self, text: &str) -> Result<Query> {
        parse_query(text, &self.stop_words)
    }

    /// Plus terms of `raw_query` present in the document, ascending. Empty if
    /// any minus term is present. Returns the document status alongside.
    pub fn match_document(
        &self,
        raw_query: &str,
        doc_id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = self.parse_query(raw_query)?;
        let meta = self.docs.get(&doc_id).ok_or(Error::NotFound(doc_id))?;

        if query.minus.iter().any(|t| meta.term_freqs.contains_key(t)) {
            return Ok((Vec::new(), meta.status));
        }
        // BTreeSet iteration keeps the result sorted.
        let matched = query
            .plus
            .into_iter()
            .filter(|t| meta.term_freqs.contains_key(t))
            .collect();
        Ok((matched, meta.status))
    }
}
