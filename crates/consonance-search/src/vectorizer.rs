//! TF-IDF vectorizer over tag text.
//!
//! Tokens are lower-cased and split on whitespace and commas; there is no
//! stemming and no stop-word list, since tags are already short curated
//! labels. Weights use smoothed inverse document frequency:
//!
//! ```text
//! tfidf(t, d) = count(t, d) × idf(t)
//! idf(t)      = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! and every document vector is scaled to unit L2 length.

use std::collections::{BTreeMap, HashMap, HashSet};

use consonance_core::{Error, Result};

use crate::vector::Vector;

/// Split tag text into lower-cased tokens on whitespace and commas.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Ordered vocabulary learned at fit time.
///
/// Terms are kept in lexicographic order so that the same corpus always
/// yields the same column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSpace {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl VectorSpace {
    fn from_sorted_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Self { terms, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn position(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    space: VectorSpace,
    idf: Vec<f64>,
}

/// TF-IDF vectorizer. Must be fitted before it can transform text.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    fitted: Option<Fitted>,
}

impl TfIdfVectorizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary and IDF weights from `corpus`.
    ///
    /// Refitting replaces any previous state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCorpus`] when the corpus has no documents or
    /// no document contains a single token.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<&VectorSpace> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in corpus {
            let unique: HashSet<String> = tokenize(doc.as_ref()).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            self.fitted = None;
            return Err(Error::EmptyCorpus {
                rows_read: corpus.len(),
            });
        }

        let n = corpus.len() as f64;
        let idf = doc_freq
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let space = VectorSpace::from_sorted_terms(doc_freq.into_keys().collect());

        log::debug!(
            "Fitted TF-IDF over {} documents, {} terms",
            corpus.len(),
            space.len()
        );

        let fitted = self.fitted.insert(Fitted { space, idf });
        Ok(&fitted.space)
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The fitted vocabulary, if any.
    #[must_use]
    pub fn space(&self) -> Option<&VectorSpace> {
        self.fitted.as_ref().map(|f| &f.space)
    }

    /// Number of vocabulary terms, or 0 when unfitted.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.space().map_or(0, VectorSpace::len)
    }

    /// Project `text` onto the fitted vocabulary.
    ///
    /// Out-of-vocabulary tokens are ignored; text with no known tokens
    /// yields a zero vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFitted`] if called before [`fit`](Self::fit).
    pub fn transform(&self, text: &str) -> Result<Vector> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;

        let mut weights = vec![0.0; fitted.space.len()];
        for token in tokenize(text) {
            if let Some(i) = fitted.space.position(&token) {
                weights[i] += 1.0;
            }
        }
        for (w, idf) in weights.iter_mut().zip(&fitted.idf) {
            *w *= idf;
        }

        let mut vector = Vector::from_weights(weights);
        vector.normalize();
        Ok(vector)
    }

    /// Transform each text in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFitted`] if called before [`fit`](Self::fit).
    pub fn transform_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vector>> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}
