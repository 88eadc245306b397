use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, split_words, StopWords};
use std::collections::BTreeSet;

/// A parsed query: terms that score a document and terms that exclude it.
/// A term in both sets excludes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus: BTreeSet<String>,
    pub minus: BTreeSet<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool { self.plus.is_empty() && self.minus.is_empty() }
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match word.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (word, false),
    };
    if (is_minus && (data.is_empty() || data.starts_with('-'))) || !is_valid_word(data) {
        return Err(Error::MalformedQuery(word.to_string()));
    }
    Ok(QueryWord { data, is_minus })
}

/// Parse raw query text. Words prefixed with `-` become minus terms; stop
/// words (checked after stripping the `-`) are dropped from both sets.
pub fn parse_query(text: &str, stop_words: &StopWords) -> Result<Query> {
    let mut query = Query::default();
    for word in split_words(text) {
        let qw = parse_query_word(word)?;
        if stop_words.contains(qw.data) {
            continue;
        }
        if qw.is_minus {
            query.minus.insert(qw.data.to_string());
        } else {
            query.plus.insert(qw.data.to_string());
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn splits_plus_and_minus() {
        let q = parse_query("fluffy -cat groomed cat -dog", &StopWords::new()).unwrap();
        assert_eq!(q.plus, set(&["cat", "fluffy", "groomed"]));
        assert_eq!(q.minus, set(&["cat", "dog"]));
    }

    #[test]
    fn duplicates_collapse() {
        let q = parse_query("cat cat -dog -dog", &StopWords::new()).unwrap();
        assert_eq!(q.plus.len(), 1);
        assert_eq!(q.minus.len(), 1);
    }

    #[test]
    fn stop_words_dropped_after_minus_strip() {
        let stop = StopWords::from_text("in the").unwrap();
        let q = parse_query("cat -in the -dog", &stop).unwrap();
        assert_eq!(q.plus, set(&["cat"]));
        assert_eq!(q.minus, set(&["dog"]));
    }

    #[test]
    fn malformed_words_fail() {
        let stop = StopWords::new();
        assert_eq!(parse_query("-", &stop), Err(Error::MalformedQuery("-".into())));
        assert_eq!(parse_query("cat --dog", &stop), Err(Error::MalformedQuery("--dog".into())));
        assert!(parse_query("-ca\u{3}t", &stop).is_err());
        assert!(parse_query("ca\u{1f}t", &stop).is_err());
    }

    #[test]
    fn hyphen_inside_word_is_plain() {
        let q = parse_query("well-known", &StopWords::new()).unwrap();
        assert_eq!(q.plus, set(&["well-known"]));
        assert!(q.minus.is_empty());
    }

    #[test]
    fn empty_query() {
        assert!(parse_query("   ", &StopWords::new()).unwrap().is_empty());
    }
}
