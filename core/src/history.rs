//! Bounded log of recent search requests.
//!
//! `RequestQueue` wraps the ranker and remembers whether each of the last
//! `history_capacity` requests found anything. The count of empty requests in
//! the window is kept incrementally.

use crate::document::{DocumentStatus, ScoredDocument};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::ranker::DocumentPredicate;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub query: String,
    pub had_results: bool,
}

#[derive(Debug)]
pub struct RequestQueue<'a> {
    index: &'a InvertedIndex,
    requests: VecDeque<RequestRecord>,
    capacity: usize,
    empty_results: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self::with_capacity(index, index.config().history_capacity)
    }

    pub fn with_capacity(index: &'a InvertedIndex, capacity: usize) -> Self {
        Self { index, requests: VecDeque::with_capacity(capacity), capacity, empty_results: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.add_find_request_by(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.add_find_request_by(raw_query, status)
    }

    /// Run the search and record whether it found anything. Requests that
    /// fail to parse are not recorded.
    pub fn add_find_request_by<P: DocumentPredicate>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>> {
        let found = self.index.find_top_documents_by(raw_query, predicate)?;
        self.record(RequestRecord { query: raw_query.to_string(), had_results: !found.is_empty() });
        Ok(found)
    }

    fn record(&mut self, record: RequestRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.requests.len() == self.capacity {
            if let Some(evicted) = self.requests.pop_front() {
                tracing::trace!(query = %evicted.query, "evicted oldest request");
                if !evicted.had_results {
                    self.empty_results -= 1;
                }
            }
        }
        if !record.had_results {
            self.empty_results += 1;
        }
        self.requests.push_back(record);
    }

    /// Empty-result requests among those retained.
    pub fn empty_result_count(&self) -> usize { self.empty_results }

    pub fn len(&self) -> usize { self.requests.len() }

    pub fn is_empty(&self) -> bool { self.requests.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    /// Retained requests, oldest first.
    pub fn requests(&self) -> impl Iterator<Item = &RequestRecord> {
        self.requests.iter()
    }
}
