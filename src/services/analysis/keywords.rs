// Keyword Extraction
// RAKE-style search query generation from the opening of a document

use crate::services::normalizer::NlpResources;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

const QUERY_WINDOW_CHARS: usize = 2000;
const FALLBACK_QUERY_CHARS: usize = 100;
const MIN_PHRASE_CHARS: usize = 4;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]+(?:'[A-Za-z]+)?|[^A-Za-z0-9\s]").expect("token regex"))
}

/// Candidate phrases: maximal runs of content words between stopwords and punctuation.
fn candidate_phrases(text: &str, resources: &NlpResources) -> Vec<Vec<String>> {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for m in token_re().find_iter(text) {
        let token = m.as_str().to_lowercase();
        let is_word = token.chars().next().map_or(false, |c| c.is_ascii_alphanumeric());
        if !is_word || resources.is_stopword(&token) {
            if !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(token);
    }
    if !current.is_empty() {
        phrases.push(current);
    }
    phrases
}

/// Phrases ranked by summed word degree/frequency, best first; ties in lexicographic order.
pub fn ranked_phrases(text: &str, resources: &NlpResources) -> Vec<(String, f64)> {
    let phrases = candidate_phrases(text, resources);

    let mut freq: HashMap<&str, f64> = HashMap::new();
    let mut degree: HashMap<&str, f64> = HashMap::new();
    for phrase in &phrases {
        for word in phrase {
            *freq.entry(word.as_str()).or_insert(0.0) += 1.0;
            *degree.entry(word.as_str()).or_insert(0.0) += phrase.len() as f64;
        }
    }

    let mut scored: BTreeMap<String, f64> = BTreeMap::new();
    for phrase in &phrases {
        let score: f64 = phrase.iter().map(|w| degree[w.as_str()] / freq[w.as_str()]).sum();
        scored.insert(phrase.join(" "), score);
    }

    let mut ranked: Vec<(String, f64)> = scored.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Up to `max_keywords` non-overlapping top phrases joined by spaces, or the opening
/// of the text when no phrase qualifies.
pub fn extract_query(text: &str, resources: &NlpResources, max_keywords: usize) -> String {
    let window: String = text.chars().take(QUERY_WINDOW_CHARS).collect();

    let mut picked: Vec<String> = Vec::new();
    let mut seen_words: HashSet<String> = HashSet::new();
    for (phrase, _) in ranked_phrases(&window, resources) {
        if picked.len() >= max_keywords {
            break;
        }
        if phrase.chars().count() <= MIN_PHRASE_CHARS {
            continue;
        }
        let words: Vec<&str> = phrase.split(' ').collect();
        if words.iter().any(|w| seen_words.contains(*w)) {
            continue;
        }
        seen_words.extend(words.iter().map(|w| w.to_string()));
        picked.push(phrase);
    }

    if picked.is_empty() {
        return text.chars().take(FALLBACK_QUERY_CHARS).collect::<String>().trim().to_string();
    }
    picked.join(" ")
}
