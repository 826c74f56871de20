// Text Processing Service
// Raw-text helpers shared by the snippet locator, the AI heuristic and the reports

use regex::Regex;
use std::sync::OnceLock;

fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence boundary regex"))
}

/// Split on runs of `.`, `!` and `?`. Pieces are trimmed and empty pieces dropped.
/// Decimal points and abbreviations are not special-cased.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    sentence_boundary_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whitespace split after case folding. Punctuation stays attached to words.
pub fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Single-line preview limited to `max_chars` characters.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out: String = flat.chars().take(max_chars).collect();
    if flat.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_collapses_terminator_runs() {
        let sentences = split_sentences("Wait... what?! Really. ");
        assert_eq!(sentences, vec!["Wait", "what", "Really"]);
    }

    #[test]
    fn test_split_sentences_without_terminator() {
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("?!.").is_empty());
    }

    #[test]
    fn test_lowercase_words_keeps_punctuation() {
        assert_eq!(lowercase_words("Hello, World"), vec!["hello,", "world"]);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(88.5237, 2), 88.52);
        assert_eq!(round_to(0.125, 1), 0.1);
        assert_eq!(round_to(12.36, 1), 12.4);
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("a\nb  c", 10), "a b c");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
