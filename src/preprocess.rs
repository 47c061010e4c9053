//! Text preprocessing shared by both tracks.
//!
//! A raw string goes through three stages before it reaches a vectorizer:
//!
//! 1. [`normalize`]: every character that is not an ASCII letter becomes a
//!    space, the text is lowercased and split on whitespace.
//! 2. [`StopWords::filter`]: tokens in the English stop-word set are dropped.
//! 3. [`Preprocessor::stem`]: each remaining token is reduced with the
//!    stemmer the artifacts were built with ([`StemmerKind`]), NLTK-style
//!    Porter unless they say otherwise.
//!
//! The surviving stems are joined with single spaces into the cleaned text.
//! Vocabularies were built from exactly this join, so the stemmer and the
//! separator must not change without re-exporting the artifacts.

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use stop_words::LANGUAGE;

use crate::error::{Result, SpamError};
use crate::porter;

/// Splits `text` into lowercase ASCII-letter tokens.
pub fn normalize(text: &str) -> Vec<String> {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().map(str::to_string).collect()
}

/// Fixed stop-word set, matched exactly against lowercased tokens.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The NLTK English list bundled with `stop-words`.
    pub fn english() -> Self {
        Self {
            words: stop_words::get(LANGUAGE::English)
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads one word per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpamError::io(path, e))?;

        let stop_words = Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );

        if stop_words.is_empty() {
            return Err(SpamError::StopWords(format!(
                "{} contains no stop words",
                path.display()
            )));
        }

        Ok(stop_words)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.contains(token))
            .collect()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

/// Stemming algorithm a vocabulary was built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemmerKind {
    /// Porter with the NLTK extensions (`nltk.stem.PorterStemmer`).
    #[default]
    Porter,
    /// Snowball English, a.k.a. Porter2.
    Snowball,
}

enum WordStemmer {
    Porter,
    Snowball(Stemmer),
}

impl WordStemmer {
    fn new(kind: StemmerKind) -> Self {
        match kind {
            StemmerKind::Porter => WordStemmer::Porter,
            StemmerKind::Snowball => WordStemmer::Snowball(Stemmer::create(Algorithm::English)),
        }
    }

    fn kind(&self) -> StemmerKind {
        match self {
            WordStemmer::Porter => StemmerKind::Porter,
            WordStemmer::Snowball(_) => StemmerKind::Snowball,
        }
    }

    fn stem(&self, token: &str) -> String {
        match self {
            WordStemmer::Porter => porter::stem(token),
            WordStemmer::Snowball(stemmer) => stemmer.stem(token).into_owned(),
        }
    }
}

/// Normalizer, stop-word filter and stemmer in one value.
pub struct Preprocessor {
    stopwords: StopWords,
    stemmer: WordStemmer,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("stopwords", &self.stopwords.len())
            .field("stemmer", &self.stemmer.kind())
            .finish()
    }
}

impl Preprocessor {
    pub fn new(stopwords: StopWords) -> Self {
        Self {
            stopwords,
            stemmer: WordStemmer::new(StemmerKind::Porter),
        }
    }

    pub fn with_stemmer(mut self, kind: StemmerKind) -> Self {
        self.stemmer = WordStemmer::new(kind);
        self
    }

    pub fn stemmer(&self) -> StemmerKind {
        self.stemmer.kind()
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn stem(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .iter()
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Normalized, filtered and stemmed tokens, in input order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.stem(self.stopwords.filter(normalize(text)))
    }

    /// The cleaned text handed to a vectorizer.
    pub fn clean(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_everything_but_ascii_letters() {
        assert_eq!(
            normalize("FREE money, now!!! call 0800-123"),
            vec!["free", "money", "now", "call"]
        );
        assert_eq!(normalize("don't"), vec!["don", "t"]);
        assert_eq!(normalize("café naïve"), vec!["caf", "na", "ve"]);
    }

    #[test]
    fn normalize_without_letters_is_empty() {
        for text in ["", "   ", "12345", "!!! ??? ...", "\t\n", "日本語 ✓ 42"] {
            assert!(normalize(text).is_empty(), "{text:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent_on_clean_input() {
        let once = normalize("see you at the meeting");
        let twice = normalize(&once.join(" "));
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_drops_every_stop_word_and_keeps_order() {
        let stopwords = StopWords::english();
        let tokens = normalize("the cat and the dog are in the house");
        let filtered = stopwords.filter(tokens);
        assert_eq!(filtered, vec!["cat", "dog", "house"]);
        assert!(filtered.iter().all(|t| !stopwords.contains(t)));
    }

    #[test]
    fn filter_removes_the_whole_english_set() {
        let stopwords = StopWords::english();
        let mut words: Vec<String> = stopwords.words.iter().cloned().collect();
        words.sort();

        let mut tokens = Vec::new();
        let mut kept = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let keeper = format!("keep{i}");
            tokens.push(word.clone());
            tokens.push(keeper.clone());
            tokens.push(word.clone());
            kept.push(keeper);
        }

        assert_eq!(stopwords.filter(tokens), kept);
    }

    #[test]
    fn filter_is_exact_membership() {
        let stopwords = StopWords::from_words(["foo"]);
        assert_eq!(
            stopwords.filter(vec!["foo".into(), "Foo".into(), "food".into()]),
            vec!["Foo", "food"]
        );
    }

    #[test]
    fn english_list_has_common_words() {
        let stopwords = StopWords::english();
        for word in ["the", "a", "and", "you", "at"] {
            assert!(stopwords.contains(word), "{word}");
        }
        assert!(!stopwords.contains("money"));
    }

    #[test]
    fn stem_reduces_inflections() {
        let pre = Preprocessor::default();
        assert_eq!(pre.stem(vec!["running".into(), "cats".into()]), vec!["run", "cat"]);
    }

    #[test]
    fn default_stemmer_is_nltk_porter() {
        let pre = Preprocessor::default();
        assert_eq!(pre.stemmer(), StemmerKind::Porter);
        let words = ["communication", "generously", "fairly", "organization", "running"];
        assert_eq!(
            pre.stem(words.iter().map(|w| w.to_string()).collect()),
            vec!["commun", "gener", "fairli", "organ", "run"]
        );
    }

    #[test]
    fn snowball_stemmer_is_selectable() {
        let pre = Preprocessor::default().with_stemmer(StemmerKind::Snowball);
        assert_eq!(pre.stemmer(), StemmerKind::Snowball);
        assert_eq!(
            pre.stem(vec!["generously".into(), "running".into()]),
            vec!["generous", "run"]
        );
    }

    #[test]
    fn stem_is_deterministic_and_accepts_its_own_output() {
        let pre = Preprocessor::default();
        let words: Vec<String> = ["generously", "connection", "happiness", "a", "zzz"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let first = pre.stem(words.clone());
        assert_eq!(first, pre.stem(words));
        let again = pre.stem(first.clone());
        assert_eq!(again.len(), first.len());
    }

    #[test]
    fn clean_joins_with_single_spaces() {
        let pre = Preprocessor::default();
        assert_eq!(pre.clean("  Running   CATS!! "), "run cat");
        assert_eq!(pre.clean("the and of"), "");
        assert_eq!(pre.clean(""), "");
    }

    #[test]
    fn stop_words_from_file_skips_comments_and_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "# custom\nfoo\n\n bar \n").unwrap();
        let stopwords = StopWords::from_file(&path).unwrap();
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("bar"));

        std::fs::write(&path, "# nothing here\n").unwrap();
        assert!(matches!(
            StopWords::from_file(&path),
            Err(SpamError::StopWords(_))
        ));
    }
}
