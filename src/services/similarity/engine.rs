// Similarity Engine
// All-pairs cosine matrix and severity banding

use super::vector_space::VectorSpace;
use crate::models::{PairResult, SimilarityBand};
use crate::services::config_store::BandThresholds;
use crate::services::error::{EngineError, EngineResult};
use crate::services::text_processor::round_to;

/// Square, symmetric, values in [0, 1], diagonal exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

/// Rows are L2-normalized, so cosine similarity is the dot product.
pub fn compute(space: &VectorSpace) -> EngineResult<SimilarityMatrix> {
    let size = space.len();
    if size < 2 {
        return Err(EngineError::InsufficientDocuments { found: size });
    }

    let rows = space.vectors();
    let mut values = vec![0.0; size * size];
    for i in 0..size {
        values[i * size + i] = 1.0;
        for j in (i + 1)..size {
            let raw = rows[i].dot(&rows[j]);
            if !raw.is_finite() {
                return Err(EngineError::Internal(format!(
                    "non-finite similarity between documents {} and {}",
                    i, j
                )));
            }
            let score = raw.clamp(0.0, 1.0);
            values[i * size + j] = score;
            values[j * size + i] = score;
        }
    }

    Ok(SimilarityMatrix { size, values })
}

pub fn classify(score: f64, thresholds: &BandThresholds) -> SimilarityBand {
    if score >= thresholds.high {
        SimilarityBand::High
    } else if score >= thresholds.medium {
        SimilarityBand::Medium
    } else {
        SimilarityBand::Low
    }
}

pub fn to_percentage(score: f64) -> f64 {
    round_to(score * 100.0, 2)
}

pub fn pair_result(matrix: &SimilarityMatrix, i: usize, j: usize, thresholds: &BandThresholds) -> PairResult {
    let similarity = matrix.get(i, j);
    PairResult {
        index_a: i,
        index_b: j,
        similarity,
        percentage: to_percentage(similarity),
        band: classify(similarity, thresholds),
    }
}

/// Every unordered pair once, in (i, j) order with i < j.
pub fn pairwise(matrix: &SimilarityMatrix, thresholds: &BandThresholds) -> Vec<PairResult> {
    let n = matrix.size();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(pair_result(matrix, i, j, thresholds));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::vector_space::VectorizerOptions;

    fn fit(items: &[&str]) -> VectorSpace {
        let docs: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        VectorSpace::fit(&docs, &VectorizerOptions::default()).unwrap()
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let space = fit(&["cat sat mat", "cat sat rug", "dog ran park", ""]);
        let m = compute(&space).unwrap();
        assert_eq!(m.size(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
        assert!(m.get(0, 1) > 0.0);
        assert_eq!(m.get(0, 2), 0.0);
        // Empty document: zero vector, zero similarity off the diagonal.
        assert_eq!(m.get(0, 3), 0.0);
    }

    #[test]
    fn test_identical_documents_score_one() {
        let space = fit(&["machine learning model", "machine learning model", "weather"]);
        let m = compute(&space).unwrap();
        assert!((m.get(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_boundaries() {
        let t = BandThresholds::default();
        assert_eq!(classify(0.8, &t), SimilarityBand::High);
        assert_eq!(classify(0.79999, &t), SimilarityBand::Medium);
        assert_eq!(classify(0.5, &t), SimilarityBand::Medium);
        assert_eq!(classify(0.49999, &t), SimilarityBand::Low);
        assert_eq!(classify(0.0, &t), SimilarityBand::Low);

        let strict = BandThresholds { high: 0.9, medium: 0.7 };
        assert_eq!(classify(0.85, &strict), SimilarityBand::Medium);
    }

    #[test]
    fn test_pairwise_enumerates_each_pair_once() {
        let space = fit(&["a b", "b c", "c d", "d e"]);
        let m = compute(&space).unwrap();
        let pairs = pairwise(&m, &BandThresholds::default());
        assert_eq!(pairs.len(), 6);
        let idx: Vec<(usize, usize)> = pairs.iter().map(|p| (p.index_a, p.index_b)).collect();
        assert_eq!(idx, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        for p in &pairs {
            assert_eq!(p.percentage, round_to(p.similarity * 100.0, 2));
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(to_percentage(0.885237), 88.52);
        assert_eq!(to_percentage(1.0), 100.0);
        assert_eq!(to_percentage(0.0), 0.0);
    }
}
