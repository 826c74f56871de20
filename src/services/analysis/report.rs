// Report Rendering
// Plain-text and ANSI-coloured views of analysis results for the terminal

use crate::models::{AiBand, AnalysisResult, PairwiseReport, SimilarityBand};
use crate::services::config_store::{AppConfig, BandThresholds};
use crate::services::similarity::classify;
use crate::services::text_processor::{preview, round_to};
use std::fmt::Write;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const SNIPPET_PREVIEW_CHARS: usize = 160;

fn colour_for(band: SimilarityBand) -> &'static str {
    match band {
        SimilarityBand::High => RED,
        SimilarityBand::Medium => YELLOW,
        SimilarityBand::Low => GREEN,
    }
}

fn colour_for_ai(band: AiBand) -> &'static str {
    match band {
        AiBand::High => RED,
        AiBand::Medium => YELLOW,
        AiBand::Low => GREEN,
    }
}

fn threshold_label(threshold: f64) -> String {
    format!("{}%", round_to(threshold * 100.0, 2))
}

fn paint(text: &str, code: &str, colour: bool) -> String {
    if colour {
        format!("{}{}{}", code, text, RESET)
    } else {
        text.to_string()
    }
}

/// Colours follow the configured similarity bands and the heuristic's own bands.
pub fn render_analysis(result: &AnalysisResult, config: &AppConfig, colour: bool) -> String {
    let mut out = String::new();
    let overall = format!("{:.2}%", result.overall_score);
    let overall_band = classify(result.overall_score / 100.0, &config.analysis.thresholds);

    let _ = writeln!(out, "{}", paint("Plagiarism Report", BOLD, colour));
    let _ = writeln!(out, "Overall score:      {}", paint(&overall, colour_for(overall_band), colour));
    let _ = writeln!(out, "Highest match:      {:.2}%", result.highest_match);
    let _ = writeln!(out, "Average similarity: {:.1}%", result.avg_similarity);
    let _ = writeln!(out, "Documents compared: {}", result.documents_compared);
    let _ = writeln!(out);

    if result.matches.is_empty() {
        let _ = writeln!(out, "No matches.");
    }
    for (rank, m) in result.matches.iter().enumerate() {
        let score = format!("{:>6.2}%", m.score);
        let _ = writeln!(
            out,
            "{:>2}. {} {} [{}] ({})",
            rank + 1,
            paint(&score, colour_for(m.band), colour),
            m.title,
            m.category,
            m.band
        );
        if !m.authors.is_empty() {
            let _ = writeln!(out, "    authors: {}", m.authors);
        }
        if !m.url.is_empty() {
            let _ = writeln!(out, "    url: {}", m.url);
        }
        let _ = writeln!(out, "    {}", preview(&m.snippet, SNIPPET_PREVIEW_CHARS));
    }

    let ai = &result.ai_detection;
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", paint("AI-likelihood (heuristic, approximate)", BOLD, colour));
    let ai_score = format!("{}/{}", ai.score, config.heuristic.score_cap);
    let _ = writeln!(out, "Score: {} ({})", paint(&ai_score, colour_for_ai(ai.band), colour), ai.band);
    if let Some(metrics) = &ai.metrics {
        let _ = writeln!(
            out,
            "Avg sentence length: {:.1} words, std dev: {:.1}, vocabulary richness: {:.2}, marker phrases: {}",
            metrics.avg_sentence_len, metrics.std_dev, metrics.vocabulary_richness, metrics.marker_phrases
        );
    }
    if let Some(reason) = &ai.reason {
        let _ = writeln!(out, "Note: {}", reason);
    }
    out
}

pub fn render_pairwise(report: &PairwiseReport, thresholds: &BandThresholds, colour: bool) -> String {
    let mut out = String::new();
    let high = threshold_label(thresholds.high);
    let medium = threshold_label(thresholds.medium);
    let _ = writeln!(out, "{}", paint("Pairwise Similarity", BOLD, colour));
    let _ = writeln!(
        out,
        "Legend: {} {} {}",
        paint(&format!(">={} high", high), RED, colour),
        paint(&format!(">={} medium", medium), YELLOW, colour),
        paint(&format!("<{} low", medium), GREEN, colour)
    );
    let _ = writeln!(out);

    for pair in &report.pairs {
        let pct = format!("{:>6.2}%", pair.percentage);
        let _ = writeln!(
            out,
            "{} vs {}: {} ({})",
            report.titles[pair.index_a],
            report.titles[pair.index_b],
            paint(&pct, colour_for(pair.band), colour),
            pair.band
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Matrix (%):");
    for (i, row) in report.matrix.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|v| paint(&format!("{:>7.2}", v * 100.0), colour_for(classify(*v, thresholds)), colour))
            .collect();
        let _ = writeln!(out, "[{:>2}] {}", i, cells.join(" "));
    }
    for (i, title) in report.titles.iter().enumerate() {
        let _ = writeln!(out, "[{:>2}] = {}", i, title);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiHeuristicResult, MatchRecord, PairResult};

    fn result() -> AnalysisResult {
        AnalysisResult {
            overall_score: 88.52,
            highest_match: 88.52,
            avg_similarity: 44.3,
            documents_compared: 2,
            matches: vec![MatchRecord {
                pool_index: 0,
                title: "Intro to ML".to_string(),
                category: "Web - arXiv".to_string(),
                similarity: 0.8852,
                score: 88.52,
                band: SimilarityBand::High,
                authors: "A. Author".to_string(),
                url: "https://arxiv.org/abs/1".to_string(),
                snippet: "...Machine learning allows systems to learn...".to_string(),
            }],
            ai_detection: AiHeuristicResult {
                score: 0,
                band: AiBand::Low,
                metrics: None,
                reason: Some("Text too short".to_string()),
            },
        }
    }

    fn report() -> PairwiseReport {
        PairwiseReport {
            titles: vec!["a.txt".to_string(), "b.txt".to_string()],
            matrix: vec![vec![1.0, 0.25], vec![0.25, 1.0]],
            pairs: vec![PairResult {
                index_a: 0,
                index_b: 1,
                similarity: 0.25,
                percentage: 25.0,
                band: SimilarityBand::Low,
            }],
        }
    }

    #[test]
    fn test_render_analysis_plain() {
        let text = render_analysis(&result(), &AppConfig::default(), false);
        assert!(text.contains("Overall score:      88.52%"));
        assert!(text.contains(" 1.  88.52% Intro to ML [Web - arXiv] (High plagiarism)"));
        assert!(text.contains("authors: A. Author"));
        assert!(text.contains("Score: 0/95 (Low)"));
        assert!(text.contains("Note: Text too short"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_analysis_colours_by_band() {
        let text = render_analysis(&result(), &AppConfig::default(), true);
        assert!(text.contains(&format!("{}88.52%{}", RED, RESET)));
        assert!(text.contains(&format!("{}0/95{}", GREEN, RESET)));
        assert_eq!(colour_for(SimilarityBand::Medium), YELLOW);
        assert_eq!(colour_for(SimilarityBand::Low), GREEN);
    }

    #[test]
    fn test_render_analysis_follows_configured_bands() {
        let mut config = AppConfig::default();
        config.analysis.thresholds = BandThresholds { high: 0.95, medium: 0.6 };
        config.heuristic.score_cap = 80;

        let mut res = result();
        res.matches[0].band = classify(res.matches[0].similarity, &config.analysis.thresholds);
        let text = render_analysis(&res, &config, true);

        // 88.52% is medium under a 95% high threshold, both for the match and the headline.
        assert!(text.contains(&format!("Overall score:      {}88.52%{}", YELLOW, RESET)));
        assert!(text.contains(&format!("{} 88.52%{} Intro to ML", YELLOW, RESET)));
        assert!(!text.contains(RED));
        assert!(text.contains("0/80"));
        assert!(!text.contains("/95"));
    }

    #[test]
    fn test_render_pairwise() {
        let text = render_pairwise(&report(), &BandThresholds::default(), false);
        assert!(text.contains("Legend: >=80% high >=50% medium <50% low"));
        assert!(text.contains("a.txt vs b.txt:  25.00% (Low plagiarism)"));
        assert!(text.contains("[ 0]  100.00   25.00"));
        assert!(text.contains("[ 1] = b.txt"));
    }

    #[test]
    fn test_render_pairwise_uses_thresholds() {
        let thresholds = BandThresholds { high: 0.9, medium: 0.2 };
        let text = render_pairwise(&report(), &thresholds, true);
        assert!(text.contains(&format!("{}>=90% high{}", RED, RESET)));
        assert!(text.contains(&format!("{}<20% low{}", GREEN, RESET)));
        // 25% sits in the medium band once medium starts at 20%.
        assert!(text.contains(&format!("{}  25.00{}", YELLOW, RESET)));
        assert!(text.contains(&format!("{} 100.00{}", RED, RESET)));
    }
}
