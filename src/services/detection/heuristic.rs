// AI Content Heuristic
// Rule-based machine-generated-text likelihood from sentence rhythm, vocabulary and stock phrases
//
// Approximate by design: the point values are hand-tuned and uncalibrated. Uniform sentence
// lengths, a mid-range type/token ratio and stock transition phrases each add points.

use crate::models::{AiBand, AiHeuristicResult, AiMetrics};
use crate::services::config_store::HeuristicConfig;
use crate::services::text_processor::{lowercase_words, round_to, split_sentences, word_count};
use std::collections::HashSet;

pub const TOO_SHORT_REASON: &str = "Text too short";

fn band_for_score(score: u32, config: &HeuristicConfig) -> AiBand {
    if score > config.high_band {
        AiBand::High
    } else if score > config.medium_band {
        AiBand::Medium
    } else {
        AiBand::Low
    }
}

fn mean_and_std_dev(values: &[usize]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Unique lowercase words over total words. Whitespace split, punctuation kept on the words.
fn vocabulary_richness(text: &str) -> f64 {
    let words = lowercase_words(text);
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    unique.len() as f64 / words.len() as f64
}

/// Number of distinct marker phrases present; repeats of one phrase count once.
fn count_marker_phrases(text: &str, phrases: &[String]) -> u32 {
    let lowered = text.to_lowercase();
    let present: HashSet<String> = phrases
        .iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty() && lowered.contains(p.as_str()))
        .collect();
    present.len() as u32
}

pub fn score_text(text: &str, config: &HeuristicConfig) -> AiHeuristicResult {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > config.min_sentence_chars)
        .collect();

    if sentences.is_empty() {
        return AiHeuristicResult {
            score: 0,
            band: AiBand::Low,
            metrics: None,
            reason: Some(TOO_SHORT_REASON.to_string()),
        };
    }

    let lengths: Vec<usize> = sentences.iter().map(|s| word_count(s)).collect();
    let (avg_len, std_dev) = mean_and_std_dev(&lengths);
    let richness = vocabulary_richness(text);
    let phrases = count_marker_phrases(text, &config.marker_phrases);

    // Point values come from user config, so every addition saturates.
    let mut score: u32 = 0;
    if std_dev < config.uniform_std_dev {
        score = score.saturating_add(config.uniform_points);
    } else if std_dev < config.steady_std_dev {
        score = score.saturating_add(config.steady_points);
    }

    let (rich_lo, rich_hi) = config.richness_window;
    if richness > rich_lo && richness < rich_hi {
        score = score.saturating_add(config.richness_points);
    }

    score = score.saturating_add(phrases.saturating_mul(config.phrase_points).min(config.phrase_cap));
    score = score.saturating_add(config.base_points).min(config.score_cap);

    AiHeuristicResult {
        score,
        band: band_for_score(score, config),
        metrics: Some(AiMetrics {
            avg_sentence_len: round_to(avg_len, 1),
            std_dev: round_to(std_dev, 1),
            vocabulary_richness: round_to(richness, 2),
            marker_phrases: phrases,
        }),
        reason: None,
    }
}
