// Configuration Storage Service
// Analysis defaults, config file read/write and version backup

use crate::services::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub heuristic: HeuristicConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            analysis: AnalysisConfig::default(),
            heuristic: HeuristicConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> EngineResult<()> {
        self.analysis.validate()?;
        self.heuristic.validate()
    }
}

// ============ Similarity ============

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self { high: 0.8, medium: 0.5 }
    }
}

/// How the single headline number is derived from the retained matches.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverallPolicy {
    /// Overall score equals the best match, so one copied source is enough to flag a document.
    #[default]
    HighestMatch,
    MeanOfMatches,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub thresholds: BandThresholds,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_snippet_scan_cap")]
    pub snippet_scan_cap: usize,
    #[serde(default = "default_snippet_min_words")]
    pub snippet_min_words: usize,
    #[serde(default)]
    pub overall_policy: OverallPolicy,
    #[serde(default = "default_min_submission_chars")]
    pub min_submission_chars: usize,
    /// Lemma dictionary replacing the embedded one, e.g. a full WordNet noun export.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            ngram_range: default_ngram_range(),
            thresholds: BandThresholds::default(),
            top_k: default_top_k(),
            snippet_scan_cap: default_snippet_scan_cap(),
            snippet_min_words: default_snippet_min_words(),
            overall_policy: OverallPolicy::default(),
            min_submission_chars: default_min_submission_chars(),
            lexicon_path: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_features == 0 {
            return Err(EngineError::InvalidConfig("maxFeatures must be positive".into()));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(EngineError::InvalidConfig(format!(
                "ngramRange ({}, {}) must satisfy 1 <= min <= max",
                min_n, max_n
            )));
        }
        let t = self.thresholds;
        if !(0.0..=1.0).contains(&t.medium) || !(0.0..=1.0).contains(&t.high) || t.medium > t.high {
            return Err(EngineError::InvalidConfig(format!(
                "thresholds must satisfy 0 <= medium ({}) <= high ({}) <= 1",
                t.medium, t.high
            )));
        }
        Ok(())
    }
}

// ============ AI Heuristic ============

/// Hand-tuned point values; none of these are calibrated against labelled data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicConfig {
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
    #[serde(default = "default_uniform_std_dev")]
    pub uniform_std_dev: f64,
    #[serde(default = "default_uniform_points")]
    pub uniform_points: u32,
    #[serde(default = "default_steady_std_dev")]
    pub steady_std_dev: f64,
    #[serde(default = "default_steady_points")]
    pub steady_points: u32,
    #[serde(default = "default_richness_window")]
    pub richness_window: (f64, f64),
    #[serde(default = "default_richness_points")]
    pub richness_points: u32,
    #[serde(default = "default_phrase_points")]
    pub phrase_points: u32,
    #[serde(default = "default_phrase_cap")]
    pub phrase_cap: u32,
    #[serde(default = "default_base_points")]
    pub base_points: u32,
    #[serde(default = "default_score_cap")]
    pub score_cap: u32,
    #[serde(default = "default_high_band")]
    pub high_band: u32,
    #[serde(default = "default_medium_band")]
    pub medium_band: u32,
    #[serde(default = "default_marker_phrases")]
    pub marker_phrases: Vec<String>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_sentence_chars: default_min_sentence_chars(),
            uniform_std_dev: default_uniform_std_dev(),
            uniform_points: default_uniform_points(),
            steady_std_dev: default_steady_std_dev(),
            steady_points: default_steady_points(),
            richness_window: default_richness_window(),
            richness_points: default_richness_points(),
            phrase_points: default_phrase_points(),
            phrase_cap: default_phrase_cap(),
            base_points: default_base_points(),
            score_cap: default_score_cap(),
            high_band: default_high_band(),
            medium_band: default_medium_band(),
            marker_phrases: default_marker_phrases(),
        }
    }
}

impl HeuristicConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.uniform_std_dev > self.steady_std_dev {
            return Err(EngineError::InvalidConfig(
                "uniformStdDev must not exceed steadyStdDev".into(),
            ));
        }
        if self.richness_window.0 > self.richness_window.1 {
            return Err(EngineError::InvalidConfig("richnessWindow is inverted".into()));
        }
        if self.medium_band > self.high_band {
            return Err(EngineError::InvalidConfig("mediumBand must not exceed highBand".into()));
        }
        Ok(())
    }
}

// ============ Reference Sources ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub corpus_dir: Option<PathBuf>,
    #[serde(default = "default_max_query_keywords")]
    pub max_query_keywords: usize,
    #[serde(default = "default_min_web_abstract_chars")]
    pub min_web_abstract_chars: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            corpus_dir: None,
            max_query_keywords: default_max_query_keywords(),
            min_web_abstract_chars: default_min_web_abstract_chars(),
        }
    }
}

fn default_version() -> String { "1.0.0".to_string() }
fn default_max_features() -> usize { 5000 }
fn default_ngram_range() -> (usize, usize) { (1, 2) }
fn default_top_k() -> usize { 10 }
fn default_snippet_scan_cap() -> usize { 50 }
fn default_snippet_min_words() -> usize { 5 }
fn default_min_submission_chars() -> usize { 10 }
fn default_min_sentence_chars() -> usize { 10 }
fn default_uniform_std_dev() -> f64 { 5.0 }
fn default_uniform_points() -> u32 { 30 }
fn default_steady_std_dev() -> f64 { 8.0 }
fn default_steady_points() -> u32 { 15 }
fn default_richness_window() -> (f64, f64) { (0.4, 0.6) }
fn default_richness_points() -> u32 { 20 }
fn default_phrase_points() -> u32 { 10 }
fn default_phrase_cap() -> u32 { 30 }
fn default_base_points() -> u32 { 10 }
fn default_score_cap() -> u32 { 95 }
fn default_high_band() -> u32 { 70 }
fn default_medium_band() -> u32 { 40 }
fn default_timeout_secs() -> u64 { 10 }
fn default_max_query_keywords() -> usize { 3 }
fn default_min_web_abstract_chars() -> usize { 50 }

fn default_marker_phrases() -> Vec<String> {
    [
        "it is important to note",
        "in conclusion",
        "furthermore",
        "moreover",
        "as an ai language model",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Store backed by an explicit file; backups go next to it.
    pub fn at_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("plague"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> EngineResult<()> {
        fs::create_dir_all(&self.config_dir).map_err(|e| EngineError::io(&self.config_dir, e))
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> EngineResult<AppConfig> {
        if !self.config_file.exists() {
            info!("[CONFIG] No config at {}, using defaults", self.config_file.display());
            return Ok(AppConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_file).map_err(|e| EngineError::io(&self.config_file, e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| EngineError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> EngineResult<()> {
        config.validate()?;
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| EngineError::Internal(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_file, content).map_err(|e| EngineError::io(&self.config_file, e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> EngineResult<()> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(|e| EngineError::io(&backup_dir, e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(|e| EngineError::io(&backup_file, e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10);

        Ok(())
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) {
        let mut entries: Vec<_> = match fs::read_dir(backup_dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
                .collect(),
            Err(e) => {
                warn!("[CONFIG] Failed to read backup dir {}: {}", backup_dir.display(), e);
                return;
            }
        };

        if entries.len() <= keep {
            return;
        }

        // Timestamped names sort chronologically
        entries.sort_by_key(|e| e.file_name());

        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
