// Aggregation Logic
// Headline statistics over the retained matches

use crate::models::MatchRecord;
use crate::services::config_store::OverallPolicy;
use crate::services::text_processor::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatchStatistics {
    pub highest_match: f64,
    pub avg_similarity: f64,
    pub overall_score: f64,
}

/// Scores are percentages. No matches means all zeros.
pub fn summarize_matches(matches: &[MatchRecord], policy: OverallPolicy) -> MatchStatistics {
    if matches.is_empty() {
        return MatchStatistics::default();
    }

    let highest_match = matches.iter().map(|m| m.score).fold(0.0, f64::max);
    let mean = matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64;
    let avg_similarity = round_to(mean, 1);

    let overall_score = match policy {
        OverallPolicy::HighestMatch => highest_match,
        OverallPolicy::MeanOfMatches => avg_similarity,
    };

    MatchStatistics {
        highest_match,
        avg_similarity,
        overall_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimilarityBand;

    fn record(score: f64) -> MatchRecord {
        MatchRecord {
            pool_index: 0,
            title: "t".to_string(),
            category: "c".to_string(),
            similarity: score / 100.0,
            score,
            band: SimilarityBand::Low,
            authors: String::new(),
            url: String::new(),
            snippet: String::new(),
        }
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize_matches(&[], OverallPolicy::HighestMatch);
        assert_eq!(stats, MatchStatistics::default());
    }

    #[test]
    fn test_overall_is_highest_by_default() {
        let matches = vec![record(88.52), record(12.0), record(0.0)];
        let stats = summarize_matches(&matches, OverallPolicy::HighestMatch);
        assert_eq!(stats.highest_match, 88.52);
        assert_eq!(stats.avg_similarity, 33.5);
        assert_eq!(stats.overall_score, 88.52);
    }

    #[test]
    fn test_mean_policy() {
        let matches = vec![record(80.0), record(20.0)];
        let stats = summarize_matches(&matches, OverallPolicy::MeanOfMatches);
        assert_eq!(stats.overall_score, 50.0);
        assert_eq!(stats.highest_match, 80.0);
    }
}
