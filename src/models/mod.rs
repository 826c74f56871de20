// PLAGUE Data Models
// Documents, batches and analysis results shared by the engine and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Documents ============

/// Where a document came from. Every origin answers the same questions
/// (title, category, authors, url) so callers never dig through loose maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DocumentOrigin {
    #[serde(rename_all = "camelCase")]
    Submitted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Corpus {
        category: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Web {
        source: String,
        #[serde(default)]
        authors: String,
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        published: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub text: String,
    pub origin: DocumentOrigin,
}

impl Document {
    pub fn submitted(text: impl Into<String>) -> Self {
        Self {
            title: "Submitted Document".to_string(),
            text: text.into(),
            origin: DocumentOrigin::Submitted { file_name: None },
        }
    }

    pub fn corpus(title: impl Into<String>, category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            origin: DocumentOrigin::Corpus {
                category: category.into(),
                path: None,
            },
        }
    }

    pub fn web(
        title: impl Into<String>,
        source: impl Into<String>,
        authors: impl Into<String>,
        url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            origin: DocumentOrigin::Web {
                source: source.into(),
                authors: authors.into(),
                url: url.into(),
                published: None,
            },
        }
    }

    pub fn category(&self) -> String {
        match &self.origin {
            DocumentOrigin::Submitted { .. } => "User Upload".to_string(),
            DocumentOrigin::Corpus { category, .. } => category.clone(),
            DocumentOrigin::Web { source, .. } => format!("Web - {}", source),
        }
    }

    pub fn authors(&self) -> Option<&str> {
        match &self.origin {
            DocumentOrigin::Web { authors, .. } if !authors.is_empty() => Some(authors),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.origin {
            DocumentOrigin::Web { url, .. } if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// One analysis request: the submitted document and everything it is compared against.
/// Batch index 0 is always `submitted`; pool item `i` sits at batch index `i + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBatch {
    pub submitted: Document,
    pub pool: Vec<Document>,
}

impl AnalysisBatch {
    pub fn new(submitted: Document, pool: Vec<Document>) -> Self {
        Self { submitted, pool }
    }

    pub fn len(&self) -> usize {
        self.pool.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Raw texts in batch order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.submitted.text.as_str()).chain(self.pool.iter().map(|d| d.text.as_str()))
    }

    pub fn pool_index_of(batch_index: usize) -> Option<usize> {
        batch_index.checked_sub(1)
    }
}

// ============ Similarity ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimilarityBand {
    High,
    Medium,
    Low,
}

impl SimilarityBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High plagiarism",
            Self::Medium => "Medium plagiarism",
            Self::Low => "Low plagiarism",
        }
    }
}

impl fmt::Display for SimilarityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairResult {
    pub index_a: usize,
    pub index_b: usize,
    pub similarity: f64,
    pub percentage: f64,
    pub band: SimilarityBand,
}

// ============ AI Heuristic ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiBand {
    Low,
    Medium,
    High,
}

impl fmt::Display for AiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMetrics {
    pub avg_sentence_len: f64,
    pub std_dev: f64,
    pub vocabulary_richness: f64,
    pub marker_phrases: u32,
}

/// Approximate likelihood that a text is machine generated.
/// Rule-based and uncalibrated: read the score as a prompt for review, not a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiHeuristicResult {
    pub score: u32,
    pub band: AiBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<AiMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============ Analysis Response ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub pool_index: usize,
    pub title: String,
    pub category: String,
    /// Cosine similarity in [0, 1].
    pub similarity: f64,
    /// Similarity as a percentage rounded to 2 decimals.
    pub score: f64,
    pub band: SimilarityBand,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub highest_match: f64,
    pub avg_similarity: f64,
    pub documents_compared: usize,
    pub matches: Vec<MatchRecord>,
    pub ai_detection: AiHeuristicResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseReport {
    pub titles: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub pairs: Vec<PairResult>,
}
