//! Bag-of-words vectorization against a frozen vocabulary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SpamError};
use crate::preprocess::StemmerKind;

/// Tokens of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector with a fixed width.
///
/// Entries are sorted by column and never hold zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    fn from_counts(dim: usize, counts: BTreeMap<usize, f64>) -> Self {
        Self {
            dim,
            entries: counts.into_iter().filter(|&(_, v)| v != 0.0).collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense row.
    ///
    /// # Panics
    ///
    /// If `row` is narrower than [`dim`](Self::dim).
    pub fn dot(&self, row: &[f64]) -> f64 {
        self.entries.iter().map(|&(c, v)| v * row[c]).sum()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(c, v) in &self.entries {
            dense[c] = v;
        }
        dense
    }
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

/// Serialized form of a [`CountVectorizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CountVectorizerParams {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    binary: bool,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default)]
    stemmer: StemmerKind,
}

/// Term-count vectorizer with a vocabulary fixed at export time.
///
/// Terms missing from the vocabulary are dropped without error. `stemmer`
/// records how the vocabulary's terms were stemmed; preprocessing must use
/// the same algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CountVectorizerParams", into = "CountVectorizerParams")]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    binary: bool,
    lowercase: bool,
    stemmer: StemmerKind,
}

impl TryFrom<CountVectorizerParams> for CountVectorizer {
    type Error = String;

    fn try_from(params: CountVectorizerParams) -> std::result::Result<Self, Self::Error> {
        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        check_columns(&params.vocabulary)?;

        let token_pattern = Regex::new(&params.token_pattern)
            .map_err(|e| format!("token_pattern does not compile: {e}"))?;

        Ok(Self {
            vocabulary: params.vocabulary,
            token_pattern,
            ngram_range: params.ngram_range,
            binary: params.binary,
            lowercase: params.lowercase,
            stemmer: params.stemmer,
        })
    }
}

impl From<CountVectorizer> for CountVectorizerParams {
    fn from(v: CountVectorizer) -> Self {
        Self {
            vocabulary: v.vocabulary,
            token_pattern: v.token_pattern.as_str().to_string(),
            ngram_range: v.ngram_range,
            binary: v.binary,
            lowercase: v.lowercase,
            stemmer: v.stemmer,
        }
    }
}

/// The vocabulary must cover columns `0..n` exactly once.
fn check_columns(vocabulary: &HashMap<String, usize>) -> std::result::Result<(), String> {
    if vocabulary.is_empty() {
        return Err("vocabulary is empty".to_string());
    }

    let n = vocabulary.len();
    let mut seen = vec![false; n];
    for (term, &column) in vocabulary {
        if column >= n {
            return Err(format!("term {term:?} maps to column {column}, width is {n}"));
        }
        if std::mem::replace(&mut seen[column], true) {
            return Err(format!("column {column} is assigned twice"));
        }
    }

    Ok(())
}

impl CountVectorizer {
    /// Unigram vectorizer with the default token pattern.
    pub fn new(vocabulary: HashMap<String, usize>) -> Result<Self> {
        Self::try_from(CountVectorizerParams {
            vocabulary,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            binary: false,
            lowercase: true,
            stemmer: StemmerKind::default(),
        })
        .map_err(SpamError::InvalidModel)
    }

    /// Assigns columns to `terms` in sorted order.
    pub fn from_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort();
        terms.dedup();

        Self::new(
            terms
                .into_iter()
                .enumerate()
                .map(|(column, term)| (term, column))
                .collect(),
        )
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_stemmer(mut self, stemmer: StemmerKind) -> Self {
        self.stemmer = stemmer;
        self
    }

    pub fn stemmer(&self) -> StemmerKind {
        self.stemmer
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            return Err(SpamError::InvalidModel(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    /// Width of every vector this vectorizer produces.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.token_pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    pub fn transform(&self, cleaned: &str) -> FeatureVector {
        let lowered;
        let text = if self.lowercase {
            lowered = cleaned.to_lowercase();
            lowered.as_str()
        } else {
            cleaned
        };

        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();

        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let column = if n == 1 {
                    self.column(window[0])
                } else {
                    self.column(&window.join(" "))
                };

                if let Some(column) = column {
                    let count = counts.entry(column).or_default();
                    if self.binary {
                        *count = 1.0;
                    } else {
                        *count += 1.0;
                    }
                }
            }
        }

        FeatureVector::from_counts(self.dimension(), counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> CountVectorizer {
        CountVectorizer::from_terms(["free", "money", "meet", "win"]).unwrap()
    }

    #[test]
    fn columns_follow_sorted_terms() {
        let v = vectorizer();
        assert_eq!(v.dimension(), 4);
        assert_eq!(v.column("free"), Some(0));
        assert_eq!(v.column("win"), Some(3));
        assert_eq!(v.column("lunch"), None);
    }

    #[test]
    fn transform_counts_known_terms_and_drops_the_rest() {
        let v = vectorizer();
        let x = v.transform("free free money lunch");
        assert_eq!(x.dim(), 4);
        assert_eq!(x.get(v.column("free").unwrap()), 2.0);
        assert_eq!(x.get(v.column("money").unwrap()), 1.0);
        assert_eq!(x.nnz(), 2);
        assert_eq!(x.to_dense(), vec![2.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_text_gives_zero_vector_of_full_width() {
        let x = vectorizer().transform("");
        assert!(x.is_zero());
        assert_eq!(x.dim(), 4);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let v = CountVectorizer::from_terms(["a", "ab"]).unwrap();
        let x = v.transform("a ab a");
        assert_eq!(x.get(v.column("a").unwrap()), 0.0);
        assert_eq!(x.get(v.column("ab").unwrap()), 1.0);
    }

    #[test]
    fn binary_mode_caps_counts() {
        let v = vectorizer().with_binary(true);
        let x = v.transform("win win win");
        assert_eq!(x.get(v.column("win").unwrap()), 1.0);
    }

    #[test]
    fn bigrams_join_with_a_space() {
        let v = CountVectorizer::from_terms(["free", "free money", "money"])
            .unwrap()
            .with_ngram_range(1, 2)
            .unwrap();
        let x = v.transform("free money");
        assert_eq!(x.nnz(), 3);
        assert_eq!(x.get(v.column("free money").unwrap()), 1.0);
    }

    #[test]
    fn rejects_gapped_or_empty_vocabularies() {
        let gapped: HashMap<String, usize> =
            [("a".to_string(), 0), ("b".to_string(), 2)].into_iter().collect();
        assert!(matches!(
            CountVectorizer::new(gapped),
            Err(SpamError::InvalidModel(_))
        ));

        let twice: HashMap<String, usize> =
            [("a".to_string(), 0), ("b".to_string(), 0)].into_iter().collect();
        assert!(CountVectorizer::new(twice).is_err());

        assert!(CountVectorizer::new(HashMap::new()).is_err());
        assert!(vectorizer().with_ngram_range(2, 1).is_err());
    }

    #[test]
    fn params_fill_defaults_when_decoding_json() {
        let v: CountVectorizer =
            serde_json::from_str(r#"{"vocabulary": {"spam": 0, "ham": 1}}"#).unwrap();
        assert_eq!(v.dimension(), 2);
        assert_eq!(v.stemmer(), StemmerKind::Porter);
        assert_eq!(v.transform("spam spam ham").to_dense(), vec![2.0, 1.0]);

        let v: CountVectorizer = serde_json::from_str(
            r#"{"vocabulary": {"spam": 0}, "stemmer": "snowball"}"#,
        )
        .unwrap();
        assert_eq!(v.stemmer(), StemmerKind::Snowball);

        let bad = serde_json::from_str::<CountVectorizer>(
            r#"{"vocabulary": {"spam": 0}, "token_pattern": "("}"#,
        );
        assert!(bad.is_err());
    }
}
