//! Plain-text matcher behind Black Notepad's Find and Replace dialogs.
//!
//! A [`SearchQuery`] is built fresh from the dialog fields every time it is
//! used. [`Matcher`] compiles it once and answers the single question the
//! find/replace flow needs: where is the next match at or after a byte offset.
//! Patterns are always literal; case sensitivity and whole-word matching are
//! independent toggles.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Error conditions raised when compiling a query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search pattern cannot be empty")]
    EmptyPattern,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Options captured from the Find/Replace dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub replacement: Option<String>,
}

impl SearchQuery {
    /// Creates a case-insensitive, substring query for `pattern`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            whole_word: false,
            replacement: None,
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_whole_word(mut self, whole_word: bool) -> Self {
        self.whole_word = whole_word;
        self
    }

    /// Text inserted in place of each match. A missing replacement deletes the match.
    pub fn replacement_text(&self) -> &str {
        self.replacement.as_deref().unwrap_or("")
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.pattern.is_empty() {
            return Err(SearchError::EmptyPattern);
        }
        Ok(())
    }
}

/// Compiled form of a [`SearchQuery`].
#[derive(Clone, Debug)]
pub struct Matcher {
    regex: Regex,
    whole_word: bool,
}

impl Matcher {
    pub fn new(query: &SearchQuery) -> Result<Self, SearchError> {
        query.validate()?;
        let regex = RegexBuilder::new(&regex::escape(&query.pattern))
            .case_insensitive(!query.case_sensitive)
            .build()
            .map_err(|err| SearchError::InvalidPattern(err.to_string()))?;
        Ok(Self {
            regex,
            whole_word: query.whole_word,
        })
    }

    /// Returns the first match starting at or after `start` (a byte offset).
    pub fn find_from(&self, text: &str, start: usize) -> Option<Range<usize>> {
        let mut pos = ceil_char_boundary(text, start)?;
        while let Some(found) = self.regex.find_at(text, pos) {
            let range = found.range();
            if !self.whole_word || is_whole_word(text, range.start, range.end) {
                return Some(range);
            }
            // Retry one character further so overlapping candidates are still considered.
            pos = range.start + text[range.start..].chars().next().map_or(1, char::len_utf8);
            if pos > text.len() {
                break;
            }
        }
        None
    }

    /// Returns every non-overlapping match in document order.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut matches = Vec::new();
        let mut pos = 0;
        while let Some(range) = self.find_from(text, pos) {
            pos = range.end;
            matches.push(range);
        }
        matches
    }

    /// Checks whether `range` is exactly a match of this query within `text`.
    pub fn matches_at(&self, text: &str, range: &Range<usize>) -> bool {
        if range.start >= range.end || range.end > text.len() {
            return false;
        }
        self.find_from(text, range.start)
            .is_some_and(|found| found == *range)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let left = text[..start].chars().next_back().is_some_and(is_word_char);
    let right = text[end..].chars().next().is_some_and(is_word_char);
    !(left || right)
}

fn ceil_char_boundary(text: &str, index: usize) -> Option<usize> {
    if index > text.len() {
        return None;
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index += 1;
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(query: SearchQuery) -> Matcher {
        Matcher::new(&query).unwrap()
    }

    #[test]
    fn find_is_case_insensitive_by_default() {
        let m = matcher(SearchQuery::new("hello"));
        assert_eq!(m.find_from("Say HELLO", 0), Some(4..9));
    }

    #[test]
    fn find_respects_case_sensitivity() {
        let m = matcher(SearchQuery::new("hello").with_case_sensitive(true));
        assert_eq!(m.find_from("Say HELLO", 0), None);
        assert_eq!(m.find_from("Say HELLO hello", 0), Some(10..15));
    }

    #[test]
    fn whole_word_skips_partial_matches() {
        let m = matcher(SearchQuery::new("cat").with_whole_word(true));
        let text = "concatenate cat";
        assert_eq!(m.find_all(text), vec![12..15]);
    }

    #[test]
    fn whole_word_and_case_are_independent() {
        let m = matcher(
            SearchQuery::new("Cat")
                .with_whole_word(true)
                .with_case_sensitive(true),
        );
        assert_eq!(m.find_all("cat Cat Cats"), vec![4..7]);
    }

    #[test]
    fn whole_word_treats_underscore_and_unicode_letters_as_word_chars() {
        let m = matcher(SearchQuery::new("id").with_whole_word(true));
        assert!(m.find_from("my_id", 0).is_none());
        assert!(m.find_from("éid", 0).is_none());
        assert_eq!(m.find_from("(id)", 0), Some(1..3));
    }

    #[test]
    fn pattern_is_literal() {
        let m = matcher(SearchQuery::new("a.b"));
        assert_eq!(m.find_all("axb a.b"), vec![4..7]);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(
            Matcher::new(&SearchQuery::new("")).unwrap_err(),
            SearchError::EmptyPattern
        );
    }

    #[test]
    fn find_from_starts_at_offset_and_handles_end() {
        let m = matcher(SearchQuery::new("ab"));
        let text = "ab ab";
        assert_eq!(m.find_from(text, 1), Some(3..5));
        assert_eq!(m.find_from(text, text.len()), None);
        assert_eq!(m.find_from(text, text.len() + 4), None);
    }

    #[test]
    fn find_from_rounds_up_inside_multibyte_chars() {
        let m = matcher(SearchQuery::new("한"));
        let text = "한국 한";
        assert_eq!(m.find_from(text, 1), Some(7..10));
    }

    #[test]
    fn matches_at_requires_exact_range() {
        let m = matcher(SearchQuery::new("foo"));
        let text = "xfoo foo";
        assert!(m.matches_at(text, &(1..4)));
        assert!(!m.matches_at(text, &(0..4)));
        assert!(!m.matches_at(text, &(2..2)));
    }

    #[test]
    fn replacement_defaults_to_deletion() {
        let query = SearchQuery::new("x");
        assert_eq!(query.replacement_text(), "");
        let query = query.with_replacement("y");
        assert_eq!(query.replacement_text(), "y");
    }
}
