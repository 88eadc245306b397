use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Split text on single spaces, dropping the empty pieces produced by
/// leading, trailing or repeated spaces. Terms are case-sensitive and
/// returned in text order.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when it contains no control characters (U+0000..=U+001F).
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Terms excluded from indexing and from query matching. Fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new() -> Self { Self::default() }

    /// Build from pre-split words. Empty entries are skipped; any word with
    /// control characters fails the whole construction.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if !is_valid_word(word) {
                return Err(Error::InvalidStopWord(word.to_string()));
            }
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(Self { words: set })
    }

    /// Build from space-delimited text.
    pub fn from_text(text: &str) -> Result<Self> {
        if !is_valid_word(text) {
            return Err(Error::InvalidStopWord(text.to_string()));
        }
        Self::from_words(split_words(text))
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Split text and drop stop words, keeping duplicates and order.
    pub fn split_no_stop<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_words(text).into_iter().filter(|w| !self.contains(w)).collect()
    }
}

impl FromStr for StopWords {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::from_text(s) }
}
