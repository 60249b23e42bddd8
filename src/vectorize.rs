//! TF-IDF vectorizer for text feature extraction.
//!
//! Turns raw text into a fixed-width dense feature vector over a vocabulary
//! built once during [`TfIdfVectorizer::fit`]. Vocabulary index assignment
//! is stable for the lifetime of a fitted vectorizer, so every transformed
//! vector has the same dimensionality. Tokens absent from the vocabulary
//! are silently dropped.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::{Result, SentiraError};

/// Dense numeric representation of a text.
pub type FeatureVector = Vec<f64>;

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    /// Vocabulary: token -> index mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each vocabulary index.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Whether fit has run.
    fitted: bool,
    /// Tokenizer used for both fitting and transforming.
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("fitted", &self.fitted)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfVectorizer {
    /// Create a new TF-IDF vectorizer with the default Unicode word tokenizer.
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(UnicodeWordTokenizer::new()))
    }

    /// Create a new TF-IDF vectorizer with the specified tokenizer.
    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            fitted: false,
            tokenizer,
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Builds the vocabulary and per-term IDF values. Fitting again replaces
    /// the previous vocabulary wholesale.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let mut vocabulary = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        // Build vocabulary and count document frequencies
        for doc in documents {
            let tokens = self.tokenize(doc)?;
            let unique_tokens: HashSet<_> = tokens.into_iter().collect();

            for token in unique_tokens {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
                if !vocabulary.contains_key(&token) {
                    let idx = vocabulary.len();
                    vocabulary.insert(token, idx);
                }
            }
        }

        // Calculate IDF for each term
        let n_documents = documents.len();
        let mut idf = vec![0.0; vocabulary.len()];
        for (word, idx) in &vocabulary {
            let df = document_frequency.get(word).unwrap_or(&0);
            // IDF = log((N + 1) / (df + 1)) + 1
            idf[*idx] = ((n_documents as f64 + 1.0) / (*df as f64 + 1.0)).ln() + 1.0;
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = n_documents;
        self.fitted = true;

        Ok(())
    }

    /// Transform a document into a TF-IDF feature vector.
    ///
    /// The output width equals the fitted vocabulary size for any input,
    /// including empty strings and strings entirely composed of
    /// out-of-vocabulary tokens (which yield a zero vector).
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        if !self.fitted {
            return Err(SentiraError::not_fitted(
                "TfIdfVectorizer::transform called before fit",
            ));
        }

        let tokens = self.tokenize(document)?;
        let mut tf = vec![0.0; self.vocabulary.len()];

        // Count term frequencies; unknown tokens are dropped
        for token in &tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                tf[idx] += 1.0;
            }
        }

        // Normalize by document length
        let doc_length = tokens.len() as f64;
        if doc_length > 0.0 {
            for count in &mut tf {
                *count /= doc_length;
            }
        }

        // Apply IDF
        for (idx, count) in tf.iter_mut().enumerate() {
            *count *= self.idf[idx];
        }

        Ok(tf)
    }

    /// Tokenize a document into plain token texts.
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .tokenizer
            .tokenize(text)?
            .into_iter()
            .map(|token| token.text)
            .collect())
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether fit has run.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Look up the vocabulary index of a token, if present.
    pub fn vocabulary_index(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_documents() -> Vec<String> {
        vec![
            "an absolutely wonderful film".to_string(),
            "a dull and boring mess".to_string(),
            "wonderful acting but a boring script".to_string(),
        ]
    }

    #[test]
    fn test_fit_transform() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&sample_documents()).unwrap();
        assert!(vectorizer.vocabulary_size() > 0);

        let features = vectorizer.transform("a wonderful script").unwrap();
        assert_eq!(features.len(), vectorizer.vocabulary_size());
        assert!(features.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = TfIdfVectorizer::new();
        let result = vectorizer.transform("anything");
        assert!(matches!(
            result,
            Err(crate::error::SentiraError::NotFitted(_))
        ));
    }

    #[test]
    fn test_dimensionality_is_constant() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&sample_documents()).unwrap();
        let width = vectorizer.vocabulary_size();

        for input in ["", "completely unknown tokens here", "wonderful", "a a a"] {
            let features = vectorizer.transform(input).unwrap();
            assert_eq!(features.len(), width, "width changed for input `{input}`");
        }
    }

    #[test]
    fn test_oov_tokens_yield_zero_vector() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&sample_documents()).unwrap();

        let features = vectorizer.transform("zyzzyva qwerty").unwrap();
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vocabulary_indices_stable() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&sample_documents()).unwrap();

        let before = vectorizer.vocabulary_index("wonderful").unwrap();
        // Arbitrary transforms must not disturb index assignment
        let _ = vectorizer.transform("wonderful boring dull").unwrap();
        let after = vectorizer.vocabulary_index("wonderful").unwrap();
        assert_eq!(before, after);
    }
}
