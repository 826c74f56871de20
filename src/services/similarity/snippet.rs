// Snippet Locator
// Finds the target sentence that best overlaps the source, as readable evidence

use crate::services::text_processor::{lowercase_words, split_sentences};
use std::collections::HashSet;

pub const NO_SNIPPET: &str = "Similar concepts or formatting detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Only the first `scan_cap` source sentences are considered.
    pub scan_cap: usize,
    /// Sentences need strictly more words than this to be candidates.
    pub min_words: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            scan_cap: 50,
            min_words: 5,
        }
    }
}

impl From<&crate::services::config_store::AnalysisConfig> for SnippetOptions {
    fn from(config: &crate::services::config_store::AnalysisConfig) -> Self {
        Self {
            scan_cap: config.snippet_scan_cap,
            min_words: config.snippet_min_words,
        }
    }
}

fn candidate_sets(sentences: Vec<String>, min_words: usize) -> Vec<(String, HashSet<String>)> {
    sentences
        .into_iter()
        .filter_map(|s| {
            let words = lowercase_words(&s);
            if words.len() <= min_words {
                return None;
            }
            let set: HashSet<String> = words.into_iter().collect();
            Some((s, set))
        })
        .collect()
}

/// Best-overlapping target sentence wrapped in ellipses, or `None` when nothing overlaps.
/// Overlap = |A ∩ B| / min(|A|, |B|) over case-folded word sets.
/// Cost is bounded by `scan_cap` source sentences times the target sentence count.
pub fn locate(source_text: &str, target_text: &str, options: &SnippetOptions) -> Option<String> {
    let mut source_sentences = split_sentences(source_text);
    source_sentences.truncate(options.scan_cap);
    let sources = candidate_sets(source_sentences, options.min_words);
    if sources.is_empty() {
        return None;
    }
    let targets = candidate_sets(split_sentences(target_text), options.min_words);

    let mut best: Option<&str> = None;
    let mut best_overlap = 0.0;
    for (target, target_set) in &targets {
        for (_, source_set) in &sources {
            let shared = source_set.intersection(target_set).count();
            if shared == 0 {
                continue;
            }
            let overlap = shared as f64 / source_set.len().min(target_set.len()) as f64;
            if overlap > best_overlap {
                best_overlap = overlap;
                best = Some(target);
            }
        }
    }

    best.map(|s| format!("...{}...", s))
}

/// `locate` with the sentinel in place of `None`.
pub fn locate_or_sentinel(source_text: &str, target_text: &str, options: &SnippetOptions) -> String {
    locate(source_text, target_text, options).unwrap_or_else(|| NO_SNIPPET.to_string())
}
