// Feature extraction: unigrams plus adjacent-word bigrams.
//
// Stopwords are removed *before* bigrams are formed, so "buy the dip" with
// "the" as a stopword yields the bigram "buy dip".

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A case-insensitive set of tokens to drop before feature extraction.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build a stopword set. Entries are lower-cased so they match
    /// normalized tokens regardless of how they were configured.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Add the stock English list from the `stop-words` crate.
    pub fn with_english(mut self) -> Self {
        let english: Vec<String> = get(LANGUAGE::English);
        self.words.extend(english.into_iter().map(|w| w.to_lowercase()));
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The deduplicated features of one document.
///
/// Terms keep their first-insertion order (unigrams, then bigrams) so the
/// corpus vocabulary built from them is reproducible run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl FeatureSet {
    /// Insert a term, ignoring duplicates. Returns true if it was new.
    pub fn insert(&mut self, term: String) -> bool {
        if self.seen.contains(&term) {
            return false;
        }
        self.seen.insert(term.clone());
        self.terms.push(term);
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(term)
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FeatureSet::default();
        for term in iter {
            set.insert(term.into());
        }
        set
    }
}

/// Drop stopwords from a token sequence, keeping the survivors in order.
pub fn filter_stopwords(tokens: &[String], stopwords: &StopWords) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !stopwords.contains(t))
        .cloned()
        .collect()
}

/// Adjacent pairs of a (stopword-filtered) token sequence, space-joined.
///
/// m tokens give m - 1 bigrams; zero or one token gives none.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Extract the feature set (unigrams ∪ bigrams) of one tokenized document.
pub fn extract_features(tokens: &[String], stopwords: &StopWords) -> FeatureSet {
    let unigrams = filter_stopwords(tokens, stopwords);
    let pairs = bigrams(&unigrams);
    unigrams.into_iter().chain(pairs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::tokenize::tokenize;

    fn stops(words: &[&str]) -> StopWords {
        StopWords::new(words.iter().copied())
    }

    #[test]
    fn test_unigrams_then_bigrams() {
        let tokens = tokenize(Some("Buy now!"));
        let features = extract_features(&tokens, &StopWords::default());
        assert_eq!(features.terms(), &["buy", "now", "buy now"]);
    }

    #[test]
    fn test_bigrams_bridge_removed_stopwords() {
        let tokens = tokenize(Some("buy the dip"));
        let features = extract_features(&tokens, &stops(&["the"]));
        assert_eq!(features.terms(), &["buy", "dip", "buy dip"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let tokens = tokenize(Some("moon moon moon"));
        let features = extract_features(&tokens, &StopWords::default());
        assert_eq!(features.terms(), &["moon", "moon moon"]);
    }

    #[test]
    fn test_stopwords_are_case_insensitive() {
        let set = stops(&["Stock", " MARKET "]);
        assert!(set.contains("stock"));
        assert!(set.contains("market"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_stopword_only_input_is_empty() {
        let tokens = tokenize(Some("stock market today"));
        let features = extract_features(&tokens, &stops(&["stock", "market", "today"]));
        assert!(features.is_empty());
    }

    #[test]
    fn test_single_token_has_no_bigrams() {
        assert!(bigrams(&["solo".to_string()]).is_empty());
        assert!(bigrams(&[]).is_empty());
    }

    #[test]
    fn test_english_list_extends_configured_words() {
        let set = stops(&["stock"]).with_english();
        assert!(set.contains("stock"));
        assert!(set.contains("the"));
    }
}
