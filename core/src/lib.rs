//! In-memory TF-IDF document search.
//!
//! Documents are split on spaces, stop words are dropped and the remaining
//! terms go into an inverted index (`term -> doc -> tf`). Queries carry plus
//! terms (ranked) and minus terms (excluded), results are ranked by TF-IDF
//! with a rating tie-break and truncated to the top K.

pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod history;
pub mod index;
pub mod query;
pub mod ranker;
pub mod shared;
pub mod tokenizer;

pub use config::SearchConfig;
pub use dedup::remove_duplicates;
pub use document::{DocumentStatus, ScoredDocument};
pub use error::{Error, Result};
pub use history::{RequestQueue, RequestRecord};
pub use index::{DocMeta, InvertedIndex};
pub use query::{parse_query, Query};
pub use ranker::DocumentPredicate;
pub use shared::SharedIndex;
pub use tokenizer::StopWords;

pub type DocId = i32;
