// Text Normalizer
// Case-fold, strip punctuation, split contractions, drop stopwords, lemmatize
//
// Tokenization: once step 2 has removed everything outside [a-z0-9\s], a token is a
// maximal run of non-whitespace. Apostrophe contractions therefore lose their apostrophe
// ("don't" -> "dont") and hyphenated compounds fuse ("state-of-the-art" -> "stateoftheart").
// A handful of fused colloquial forms are then split in two the way Treebank tokenizers
// do ("cannot" -> "can not", "gonna" -> "gon na"), before stopwords are dropped.
//
// Lemmatization follows WordNet noun morphology: an exception list first, then suffix
// detachment applied repeatedly until a form lands in the noun lexicon. The shortest
// matching lemma wins; words with no match pass through unchanged.

use crate::services::config_store::AnalysisConfig;
use crate::services::error::{EngineError, EngineResult};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Noun detachment rules, in WordNet order.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Whole tokens split into two after punctuation is gone.
const CONTRACTION_SPLITS: &[(&str, &str, &str)] = &[
    ("cannot", "can", "not"),
    ("gimme", "gim", "me"),
    ("gonna", "gon", "na"),
    ("gotta", "got", "ta"),
    ("lemme", "lem", "me"),
    ("wanna", "wan", "na"),
];

const ENGLISH_STOPWORDS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/english_stopwords.txt"));
const ENGLISH_LEMMAS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/english_lemmas.json"));

/// On-disk lemma dictionary: irregular plurals plus the noun lexicon.
#[derive(Debug, Deserialize)]
struct LemmaFile {
    #[serde(default)]
    exceptions: HashMap<String, Vec<String>>,
    nouns: Vec<String>,
}

/// Stopword set and lemma dictionary. Built once, never mutated.
#[derive(Debug)]
pub struct NlpResources {
    stopwords: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
    lexicon: HashSet<String>,
}

static ENGLISH: OnceLock<Arc<NlpResources>> = OnceLock::new();

fn apply_rules(forms: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for form in forms {
        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            if let Some(stem) = form.strip_suffix(suffix) {
                let candidate = format!("{}{}", stem, replacement);
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
    }
    out
}

fn split_contraction(token: &str) -> (&str, Option<&str>) {
    match CONTRACTION_SPLITS.iter().find(|(whole, _, _)| *whole == token) {
        Some((_, head, tail)) => (*head, Some(*tail)),
        None => (token, None),
    }
}

impl NlpResources {
    /// Process-wide English resources embedded in the binary.
    pub fn english() -> Arc<NlpResources> {
        ENGLISH
            .get_or_init(|| {
                let parsed: LemmaFile =
                    serde_json::from_str(ENGLISH_LEMMAS).expect("english_lemmas.json parse failed");
                Arc::new(Self::from_parts(
                    ENGLISH_STOPWORDS.lines(),
                    parsed.exceptions,
                    parsed.nouns,
                ))
            })
            .clone()
    }

    /// English stopwords with the lemma dictionary read from `path` instead of the
    /// embedded one. The file has the same shape: `{"exceptions": {..}, "nouns": [..]}`.
    /// Use this to plug in a complete WordNet noun export.
    pub fn english_with_lexicon(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let parsed: LemmaFile = serde_json::from_str(&content).map_err(|e| {
            EngineError::InvalidConfig(format!("Failed to parse lexicon {}: {}", path.display(), e))
        })?;
        let resources = Self::from_parts(ENGLISH_STOPWORDS.lines(), parsed.exceptions, parsed.nouns);
        info!(
            "[NORMALIZER] Loaded lexicon {} ({} nouns, {} exceptions)",
            path.display(),
            resources.lexicon_size(),
            resources.exceptions.len()
        );
        Ok(resources)
    }

    pub fn from_parts<'a>(
        stopwords: impl IntoIterator<Item = &'a str>,
        exceptions: HashMap<String, Vec<String>>,
        nouns: impl IntoIterator<Item = String>,
    ) -> Self {
        let stopwords = stopwords
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let lexicon = nouns
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            stopwords,
            exceptions,
            lexicon,
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    fn known<'a, S: AsRef<str>>(&'a self, forms: impl IntoIterator<Item = S>, found: &mut Vec<&'a str>) {
        for form in forms {
            if let Some(lemma) = self.lexicon.get(form.as_ref()) {
                if !found.contains(&lemma.as_str()) {
                    found.push(lemma);
                }
            }
        }
    }

    /// Dictionary lemma of a lowercase token, or the token itself when unknown.
    pub fn lemmatize<'a>(&'a self, token: &'a str) -> &'a str {
        let mut found: Vec<&str> = Vec::new();

        if let Some(targets) = self.exceptions.get(token) {
            // Exception targets still have to be nouns; the token itself competes with them.
            self.known(std::iter::once(token).chain(targets.iter().map(String::as_str)), &mut found);
        } else {
            let mut forms = apply_rules(&[token.to_string()]);
            self.known(std::iter::once(token), &mut found);
            self.known(&forms, &mut found);
            while found.is_empty() && !forms.is_empty() {
                forms = apply_rules(&forms);
                self.known(&forms, &mut found);
            }
        }

        found.into_iter().min_by_key(|lemma| lemma.len()).unwrap_or(token)
    }
}

fn non_alnum_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("non-alnum regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    resources: Arc<NlpResources>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NlpResources::english())
    }
}

impl Normalizer {
    pub fn new(resources: Arc<NlpResources>) -> Self {
        Self { resources }
    }

    /// Embedded English resources, or the configured lexicon file when one is set.
    pub fn from_config(config: &AnalysisConfig) -> EngineResult<Self> {
        match &config.lexicon_path {
            Some(path) => Ok(Self::new(Arc::new(NlpResources::english_with_lexicon(path)?))),
            None => Ok(Self::default()),
        }
    }

    pub fn resources(&self) -> &NlpResources {
        &self.resources
    }

    /// Canonical token stream joined by single spaces. Empty input yields "".
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = non_alnum_re().replace_all(&lowered, "");
        let collapsed = whitespace_re().replace_all(&stripped, " ");

        collapsed
            .trim()
            .split(' ')
            .flat_map(|t| {
                let (head, tail) = split_contraction(t);
                std::iter::once(head).chain(tail)
            })
            .filter(|t| !t.is_empty() && !self.resources.is_stopword(t))
            .map(|t| self.resources.lemmatize(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn normalize_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        texts.into_iter().map(|t| self.normalize(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_resources_load() {
        let res = NlpResources::english();
        assert_eq!(res.stopword_count(), 179);
        assert!(res.is_stopword("the"));
        assert!(!res.is_stopword("learning"));
    }

    #[test]
    fn test_normalize_pipeline() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("The Cats sat on the MATS, didn't they?"),
            "cat sat mat didnt"
        );
    }

    #[test]
    fn test_normalize_empty_and_stopword_only() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   "), "");
        assert_eq!(n.normalize("it is what it is"), "");
    }

    #[test]
    fn test_hyphens_and_apostrophes_fuse() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("state-of-the-art"), "stateoftheart");
        assert_eq!(n.normalize("can't"), "cant");
    }

    #[test]
    fn test_fused_contractions_split() {
        let n = Normalizer::default();
        // "can", "not" and "me" are stopwords once separated.
        assert_eq!(n.normalize("We cannot stop"), "stop");
        assert_eq!(n.normalize("gonna win"), "gon na win");
        assert_eq!(n.normalize("Wanna go? Gotta run, lemme see, gimme that"), "wan na go got ta run lem see gim");
        // Only whole tokens split.
        assert_eq!(n.normalize("cannoted gonnas"), "cannoted gonnas");
    }

    #[test]
    fn test_non_ascii_is_stripped() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("café résumé"), "caf rsum");
    }

    #[test]
    fn test_lemmatize_rules_and_exceptions() {
        let res = NlpResources::english();
        assert_eq!(res.lemmatize("systems"), "system");
        assert_eq!(res.lemmatize("networks"), "network");
        assert_eq!(res.lemmatize("boxes"), "box");
        assert_eq!(res.lemmatize("branches"), "branch");
        assert_eq!(res.lemmatize("studies"), "study");
        assert_eq!(res.lemmatize("children"), "child");
        assert_eq!(res.lemmatize("analyses"), "analysis");
        assert_eq!(res.lemmatize("wolves"), "wolf");
        assert_eq!(res.lemmatize("knives"), "knife");
        // Unknown words come back unchanged.
        assert_eq!(res.lemmatize("glorps"), "glorps");
        assert_eq!(res.lemmatize("class"), "class");
    }

    #[test]
    fn test_common_plurals_reach_their_singular() {
        let res = NlpResources::english();
        assert!(res.lexicon_size() > 4000);
        for (plural, singular) in [
            ("rivers", "river"),
            ("doctors", "doctor"),
            ("patients", "patient"),
            ("planets", "planet"),
            ("storms", "storm"),
            ("oceans", "ocean"),
            ("songs", "song"),
            ("leaves", "leaf"),
            ("shelves", "shelf"),
            ("women", "woman"),
        ] {
            assert_eq!(res.lemmatize(plural), singular, "{}", plural);
        }
    }

    #[test]
    fn test_lemmatize_keeps_wordnet_quirks() {
        let res = NlpResources::english();
        // "-s" detachment wins whenever the stem is itself a noun.
        assert_eq!(res.lemmatize("species"), "specie");
        assert_eq!(res.lemmatize("physics"), "physic");
        assert_eq!(res.lemmatize("statistics"), "statistic");
        // A noun form shorter than its exception target stays as is.
        assert_eq!(res.lemmatize("data"), "data");
        assert_eq!(res.lemmatize("media"), "media");
        assert_eq!(res.lemmatize("axes"), "ax");
    }

    #[test]
    fn test_repeated_rule_application() {
        let res = NlpResources::from_parts(
            std::iter::empty(),
            HashMap::new(),
            vec!["glass".to_string()],
        );
        // "glasseses" -> "glasses" (no match) -> "glass"
        assert_eq!(res.lemmatize("glasseses"), "glass");
        assert_eq!(res.lemmatize("glasses"), "glass");
    }

    #[test]
    fn test_custom_resources() {
        let res = NlpResources::from_parts(
            ["foo"],
            HashMap::from([("geese".to_string(), vec!["goose".to_string()])]),
            vec!["widget".to_string(), "goose".to_string()],
        );
        let n = Normalizer::new(Arc::new(res));
        assert_eq!(n.normalize("Foo widgets geese"), "widget goose");
    }

    #[test]
    fn test_exception_targets_must_be_nouns() {
        let res = NlpResources::from_parts(
            std::iter::empty(),
            HashMap::from([("geese".to_string(), vec!["goose".to_string()])]),
            vec!["widget".to_string()],
        );
        assert_eq!(res.lemmatize("geese"), "geese");
    }

    #[test]
    fn test_lexicon_file_replaces_embedded_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nouns.json");
        fs::write(
            &path,
            r#"{"exceptions": {"octopodes": ["octopus"]}, "nouns": ["octopus", "glorp"]}"#,
        )
        .unwrap();

        let res = NlpResources::english_with_lexicon(&path).unwrap();
        assert_eq!(res.lexicon_size(), 2);
        assert_eq!(res.stopword_count(), 179);
        let n = Normalizer::new(Arc::new(res));
        assert_eq!(n.normalize("The glorps and octopodes"), "glorp octopus");
    }

    #[test]
    fn test_normalizer_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nouns.json");
        fs::write(&path, r#"{"nouns": ["glorp"]}"#).unwrap();

        let mut config = AnalysisConfig::default();
        assert!(Normalizer::from_config(&config).unwrap().resources().lexicon_size() > 4000);

        config.lexicon_path = Some(path);
        let n = Normalizer::from_config(&config).unwrap();
        assert_eq!(n.normalize("glorps rivers"), "glorp rivers");
    }

    #[test]
    fn test_lexicon_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = NlpResources::english_with_lexicon(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, EngineError::Io { .. }));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        assert!(matches!(
            NlpResources::english_with_lexicon(&bad),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
