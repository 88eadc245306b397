use crate::DocId;

/// Errors returned by index and query operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Document ids must be non-negative.
    #[error("invalid document id: {0}")]
    InvalidId(DocId),
    /// The id is already present in the index.
    #[error("document already exists: {0}")]
    DuplicateId(DocId),
    /// Document text contains control characters.
    #[error("document text contains control characters")]
    InvalidContent,
    #[error("invalid stop word: {0:?}")]
    InvalidStopWord(String),
    /// A query word is a bare `-`, starts with `--` or contains control characters.
    #[error("malformed query word: {0:?}")]
    MalformedQuery(String),
    #[error("document not found: {0}")]
    NotFound(DocId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
