// Vector Space Model
// Smoothed TF-IDF over unigrams and bigrams, one fitted space per batch
//
// weight(t, d) = tf(t, d) * (ln((1 + N) / (1 + df(t))) + 1), then each row is L2-normalized.

use crate::services::error::{EngineError, EngineResult};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizerOptions {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
        }
    }
}

impl From<&crate::services::config_store::AnalysisConfig> for VectorizerOptions {
    fn from(config: &crate::services::config_store::AnalysisConfig) -> Self {
        Self {
            max_features: config.max_features,
            ngram_range: config.ngram_range,
        }
    }
}

/// Sparse row: `(column, weight)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Merge-walk dot product; summation runs in column order so a·b == b·a bit for bit.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Frozen vocabulary plus one weight row per document.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    features: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl VectorSpace {
    /// Fit over normalized documents (already punctuation-free, so a whitespace split is exact).
    pub fn fit(documents: &[String], options: &VectorizerOptions) -> EngineResult<VectorSpace> {
        let (min_n, max_n) = options.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(EngineError::InvalidConfig(format!(
                "ngram range ({}, {}) must satisfy 1 <= min <= max",
                min_n, max_n
            )));
        }
        if options.max_features == 0 {
            return Err(EngineError::InvalidConfig("max_features must be positive".into()));
        }
        if documents.len() < 2 {
            return Err(EngineError::InsufficientDocuments {
                found: documents.len(),
            });
        }

        let counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|doc| count_ngrams(doc, min_n, max_n))
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut total_freq: HashMap<&str, u64> = HashMap::new();
        for doc_counts in &counts {
            for (term, &c) in doc_counts {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                *total_freq.entry(term.as_str()).or_insert(0) += u64::from(c);
            }
        }

        let mut features: Vec<&str> = total_freq.keys().copied().collect();
        if features.len() > options.max_features {
            // Keep the most frequent n-grams; lexicographic order breaks ties.
            features.sort_by(|a, b| total_freq[b].cmp(&total_freq[a]).then_with(|| a.cmp(b)));
            features.truncate(options.max_features);
        }
        features.sort_unstable();

        let columns: HashMap<&str, usize> = features.iter().enumerate().map(|(i, t)| (*t, i)).collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = features
            .iter()
            .map(|t| ((1.0 + n) / (1.0 + doc_freq[t] as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = counts
            .iter()
            .map(|doc_counts| {
                let mut entries: Vec<(usize, f64)> = doc_counts
                    .iter()
                    .filter_map(|(term, &tf)| {
                        columns
                            .get(term.as_str())
                            .map(|&col| (col, f64::from(tf) * idf[col]))
                    })
                    .collect();
                entries.sort_unstable_by_key(|(col, _)| *col);
                l2_normalize(&mut entries);
                SparseVector::from_sorted(entries)
            })
            .collect();

        debug!(
            "[VECTOR] fitted documents={} vocabulary={} candidates={}",
            documents.len(),
            features.len(),
            total_freq.len()
        );

        Ok(VectorSpace {
            features: features.into_iter().map(str::to_string).collect(),
            idf,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.features.len()
    }

    /// Lexicographically ordered n-grams; position is the column index.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn column_of(&self, ngram: &str) -> Option<usize> {
        self.features.binary_search_by(|f| f.as_str().cmp(ngram)).ok()
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.rows
    }
}

fn count_ngrams(doc: &str, min_n: usize, max_n: usize) -> HashMap<String, u32> {
    let tokens: Vec<&str> = doc.split_whitespace().collect();
    let mut counts = HashMap::new();
    for n in min_n..=max_n {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

fn l2_normalize(entries: &mut [(usize, f64)]) {
    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in entries.iter_mut() {
            *w /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_requires_two_documents() {
        let err = VectorSpace::fit(&docs(&["only one"]), &VectorizerOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientDocuments { found: 1 }));
        let err = VectorSpace::fit(&[], &VectorizerOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientDocuments { found: 0 }));
    }

    #[test]
    fn test_vocabulary_has_unigrams_and_bigrams_sorted() {
        let space = VectorSpace::fit(&docs(&["red apple", "green apple"]), &VectorizerOptions::default()).unwrap();
        assert_eq!(
            space.features(),
            &["apple", "green", "green apple", "red", "red apple"]
        );
        assert_eq!(space.column_of("red apple"), Some(4));
        assert_eq!(space.column_of("blue"), None);
    }

    #[test]
    fn test_smoothed_idf() {
        let space = VectorSpace::fit(&docs(&["red apple", "green apple"]), &VectorizerOptions::default()).unwrap();
        // "apple" is in both documents: ln(3/3) + 1 = 1
        let apple = space.column_of("apple").unwrap();
        assert!((space.idf(apple).unwrap() - 1.0).abs() < 1e-12);
        // "red" is in one: ln(3/2) + 1
        let red = space.column_of("red").unwrap();
        assert!((space.idf(red).unwrap() - ((1.5f64).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length_or_zero() {
        let space = VectorSpace::fit(
            &docs(&["alpha beta gamma", "beta gamma delta", ""]),
            &VectorizerOptions::default(),
        )
        .unwrap();
        assert!((space.vector(0).unwrap().norm() - 1.0).abs() < 1e-12);
        assert!((space.vector(1).unwrap().norm() - 1.0).abs() < 1e-12);
        assert!(space.vector(2).unwrap().is_zero());
    }

    #[test]
    fn test_max_features_keeps_most_frequent_then_lexicographic() {
        let options = VectorizerOptions {
            max_features: 2,
            ngram_range: (1, 1),
        };
        let space = VectorSpace::fit(&docs(&["zeta zeta beta", "alpha zeta"]), &options).unwrap();
        // zeta=3, then alpha/beta tie at 1 -> alpha wins lexicographically
        assert_eq!(space.features(), &["alpha", "zeta"]);
    }

    #[test]
    fn test_feature_cap_is_independent_of_document_order() {
        let options = VectorizerOptions {
            max_features: 3,
            ngram_range: (1, 2),
        };
        let a = VectorSpace::fit(&docs(&["one two three", "three four five", "five six"]), &options).unwrap();
        let b = VectorSpace::fit(&docs(&["five six", "one two three", "three four five"]), &options).unwrap();
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn test_invalid_ngram_range() {
        let options = VectorizerOptions {
            max_features: 10,
            ngram_range: (0, 2),
        };
        let err = VectorSpace::fit(&docs(&["a", "b"]), &options).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_dot_is_symmetric() {
        let space = VectorSpace::fit(
            &docs(&["shared words here", "shared words there", "nothing alike"]),
            &VectorizerOptions::default(),
        )
        .unwrap();
        let (a, b) = (space.vector(0).unwrap(), space.vector(1).unwrap());
        assert_eq!(a.dot(b), b.dot(a));
        assert!(a.dot(b) > 0.0);
        assert_eq!(a.dot(space.vector(2).unwrap()), 0.0);
    }
}
