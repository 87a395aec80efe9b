// Corpus vocabulary and binary bag-of-words encoding.
//
// The vocabulary is every feature term across the surviving documents, in
// first-occurrence order. A term's position in it is its vector index for
// the rest of the run. Vectors record presence only, never counts.
//
// Vectors are dense, so memory is O(documents * vocabulary). Bigrams make
// the vocabulary grow quickly; very large corpora would want a sparse
// representation here.

use std::collections::HashMap;

use super::features::FeatureSet;

/// A document's binary feature vector: 1.0 where the vocabulary term is
/// present, 0.0 elsewhere.
pub type DocumentVector = Vec<f64>;

/// Ordered, deduplicated feature terms for one corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Merge per-document feature sets in corpus order.
    pub fn build(documents: &[FeatureSet]) -> Self {
        let mut vocab = Vocabulary::default();
        for doc in documents {
            for term in doc.terms() {
                if !vocab.index.contains_key(term) {
                    vocab.index.insert(term.clone(), vocab.terms.len());
                    vocab.terms.push(term.clone());
                }
            }
        }
        vocab
    }

    /// Map one feature set onto a fixed-length binary vector.
    pub fn encode(&self, features: &FeatureSet) -> DocumentVector {
        let mut vector = vec![0.0; self.terms.len()];
        for term in features.terms() {
            if let Some(&i) = self.index.get(term) {
                vector[i] = 1.0;
            }
        }
        vector
    }

    /// Encode every document, preserving order.
    pub fn encode_all(&self, documents: &[FeatureSet]) -> Vec<DocumentVector> {
        documents.iter().map(|d| self.encode(d)).collect()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

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
