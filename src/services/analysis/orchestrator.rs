// Analysis Orchestrator
// Scores one submitted document against a pool of references

use super::aggregation::summarize_matches;
use super::keywords::extract_query;
use super::sources::{gather_references, ReferenceSource};
use crate::models::{AnalysisBatch, AnalysisResult, Document, MatchRecord};
use crate::services::config_store::AppConfig;
use crate::services::detection::score_text;
use crate::services::error::{EngineError, EngineResult};
use crate::services::normalizer::Normalizer;
use crate::services::similarity::{
    compute, locate_or_sentinel, pair_result, SnippetOptions, VectorSpace, VectorizerOptions,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Reject submissions with fewer than `min_chars` characters after trimming.
pub fn validate_submission(text: &str, min_chars: usize) -> EngineResult<()> {
    let chars = text.trim().chars().count();
    if chars < min_chars {
        return Err(EngineError::SubmissionTooShort { chars, min: min_chars });
    }
    Ok(())
}

/// Owns the normalizer and the configuration. Every call fits its own vector space,
/// so one analyzer can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Analyzer {
    normalizer: Normalizer,
    config: AppConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            config: AppConfig::default(),
        }
    }
}

impl Analyzer {
    pub fn new(normalizer: Normalizer, config: AppConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { normalizer, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn analyze_batch(&self, batch: &AnalysisBatch) -> EngineResult<AnalysisResult> {
        self.analyze(&batch.submitted, &batch.pool)
    }

    pub fn analyze(&self, submitted: &Document, pool: &[Document]) -> EngineResult<AnalysisResult> {
        let started = Instant::now();
        let analysis = &self.config.analysis;

        let kept: Vec<(usize, &Document)> = pool
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.text.trim().is_empty())
            .collect();
        if kept.len() < pool.len() {
            debug!("[ANALYSIS] Dropped {} blank pool documents", pool.len() - kept.len());
        }

        let ai_detection = score_text(&submitted.text, &self.config.heuristic);

        if kept.is_empty() {
            info!("[ANALYSIS] Empty pool, nothing to compare");
            return Ok(AnalysisResult {
                overall_score: 0.0,
                highest_match: 0.0,
                avg_similarity: 0.0,
                documents_compared: 0,
                matches: Vec::new(),
                ai_detection,
            });
        }

        let batch = AnalysisBatch::new(
            submitted.clone(),
            kept.iter().map(|(_, d)| (*d).clone()).collect(),
        );
        let normalized = self.normalizer.normalize_all(batch.texts());
        let space = VectorSpace::fit(&normalized, &VectorizerOptions::from(analysis))?;
        let matrix = compute(&space)?;
        debug!(
            "[ANALYSIS] Fitted {} documents over {} features",
            space.len(),
            space.vocabulary_size()
        );

        let mut matches: Vec<MatchRecord> = kept
            .iter()
            .enumerate()
            .map(|(i, (pool_index, doc))| {
                let pair = pair_result(&matrix, 0, i + 1, &analysis.thresholds);
                MatchRecord {
                    pool_index: *pool_index,
                    title: doc.title.clone(),
                    category: doc.category(),
                    similarity: pair.similarity,
                    score: pair.percentage,
                    band: pair.band,
                    authors: doc.authors().unwrap_or_default().to_string(),
                    url: doc.url().unwrap_or_default().to_string(),
                    snippet: String::new(),
                }
            })
            .collect();

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(analysis.top_k);

        let snippet_options = SnippetOptions::from(analysis);
        for record in matches.iter_mut() {
            record.snippet = locate_or_sentinel(&submitted.text, &pool[record.pool_index].text, &snippet_options);
        }

        let stats = summarize_matches(&matches, analysis.overall_policy);
        info!(
            "[ANALYSIS] compared={} kept={} overall={:.2} highest={:.2} ai_score={} elapsed_ms={}",
            kept.len(),
            matches.len(),
            stats.overall_score,
            stats.highest_match,
            ai_detection.score,
            started.elapsed().as_millis()
        );

        Ok(AnalysisResult {
            overall_score: stats.overall_score,
            highest_match: stats.highest_match,
            avg_similarity: stats.avg_similarity,
            documents_compared: kept.len(),
            matches,
            ai_detection,
        })
    }

    /// Gather references from every source in parallel, then analyze against all of them.
    pub async fn analyze_with_sources(
        &self,
        submitted: &Document,
        sources: &[Arc<dyn ReferenceSource>],
    ) -> EngineResult<AnalysisResult> {
        let sources_config = &self.config.sources;
        let query = extract_query(
            &submitted.text,
            self.normalizer.resources(),
            sources_config.max_query_keywords,
        );
        info!("[ANALYSIS] Reference query: {}", query);

        let gathered = gather_references(sources, &query, Duration::from_secs(sources_config.timeout_secs)).await;
        if gathered.all_failed() {
            warn!("[ANALYSIS] Every reference source failed; comparing against nothing");
        }

        self.analyze(submitted, &gathered.documents)
    }
}
