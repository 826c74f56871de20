// Similarity Module
// Classical bag-of-n-grams plagiarism scoring:
// - vector_space: TF-IDF fitting over a batch of normalized documents
// - engine: cosine matrix, banding and pair enumeration
// - snippet: sentence-level evidence between two raw texts

pub mod engine;
pub mod snippet;
pub mod vector_space;

pub use engine::{classify, compute, pair_result, pairwise, to_percentage, SimilarityMatrix};
pub use snippet::{locate, locate_or_sentinel, SnippetOptions, NO_SNIPPET};
pub use vector_space::{SparseVector, VectorSpace, VectorizerOptions};

use crate::models::{Document, PairwiseReport};
use crate::services::config_store::AnalysisConfig;
use crate::services::error::EngineResult;
use crate::services::normalizer::Normalizer;

/// Compare every document with every other one (no submitted document involved).
pub fn compare_documents(
    documents: &[Document],
    normalizer: &Normalizer,
    config: &AnalysisConfig,
) -> EngineResult<PairwiseReport> {
    config.validate()?;
    let normalized = normalizer.normalize_all(documents.iter().map(|d| d.text.as_str()));
    let space = VectorSpace::fit(&normalized, &VectorizerOptions::from(config))?;
    let matrix = compute(&space)?;
    let pairs = pairwise(&matrix, &config.thresholds);

    Ok(PairwiseReport {
        titles: documents.iter().map(|d| d.title.clone()).collect(),
        matrix: matrix.to_rows(),
        pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimilarityBand;
    use crate::services::error::EngineError;

    #[test]
    fn test_compare_documents_report() {
        let docs = vec![
            Document::corpus("A", "notes", "Neural networks learn layered representations of data."),
            Document::corpus("B", "notes", "Neural networks learn layered representations of data."),
            Document::corpus("C", "notes", "The harbour was quiet before the storm arrived."),
        ];
        let report = compare_documents(&docs, &Normalizer::default(), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.titles, vec!["A", "B", "C"]);
        assert_eq!(report.matrix.len(), 3);
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.pairs[0].band, SimilarityBand::High);
        assert_eq!(report.pairs[0].percentage, 100.0);
        assert_eq!(report.pairs[1].band, SimilarityBand::Low);
    }

    #[test]
    fn test_compare_documents_needs_two() {
        let docs = vec![Document::corpus("A", "notes", "lonely")];
        let err = compare_documents(&docs, &Normalizer::default(), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientDocuments { found: 1 }));
    }
}
