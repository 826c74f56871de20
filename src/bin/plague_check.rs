use anyhow::{bail, Context, Result};
use plague_core::models::Document;
use plague_core::services::analysis::{
    load_text_folder, render_analysis, render_pairwise, validate_submission, Analyzer, CorpusSource,
    ReferenceSource, SavedWebResults,
};
use plague_core::services::config_store::{AppConfig, ConfigStore};
use plague_core::services::normalizer::Normalizer;
use plague_core::services::similarity::compare_documents;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const USAGE: &str = "Usage:
  plague-check <submitted.txt> [--corpus <dir>] [--web-results <json>] [--top <n>] [--config <path>] [--lexicon <json>] [--out <json_path>] [--no-color]
  plague-check --pairwise <dir> [--config <path>] [--lexicon <json>] [--no-color]

Notes:
  - Without --corpus the corpusDir from the configuration file is used, if any.
  - --web-results reads previously saved search results (a JSON array of papers).
  - --lexicon replaces the embedded noun dictionary ({\"exceptions\": {..}, \"nouns\": [..]}).
  - Set PLAGUE_DISABLE_FILE_LOG=1 to keep logs on stderr only.";

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn load_config(args: &[String]) -> Result<AppConfig> {
    let store = match parse_arg_value(args, "--config") {
        Some(path) => ConfigStore::at_file(PathBuf::from(path)),
        None => match ConfigStore::default_config_dir() {
            Some(dir) => ConfigStore::new(dir),
            None => return Ok(AppConfig::default()),
        },
    };
    store
        .load()
        .with_context(|| format!("failed to load config {}", store.config_file().display()))
}

fn run_pairwise(dir: &Path, config: &AppConfig, colour: bool) -> Result<()> {
    let documents = load_text_folder(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    if documents.len() < 2 {
        bail!("need at least two .txt files in {}, found {}", dir.display(), documents.len());
    }
    let normalizer = Normalizer::from_config(&config.analysis)?;
    let report = compare_documents(&documents, &normalizer, &config.analysis)?;
    print!("{}", render_pairwise(&report, &config.analysis.thresholds, colour));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") || has_flag(&args, "-h") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    plague_core::init_logging();

    let mut config = load_config(&args)?;
    if let Some(lexicon) = parse_arg_value(&args, "--lexicon") {
        config.analysis.lexicon_path = Some(PathBuf::from(lexicon));
    }
    let colour = !has_flag(&args, "--no-color") && std::io::stdout().is_terminal();

    if let Some(dir) = parse_arg_value(&args, "--pairwise") {
        return run_pairwise(Path::new(&dir), &config, colour);
    }

    if let Some(top) = parse_arg_value(&args, "--top") {
        config.analysis.top_k = top.parse().with_context(|| format!("invalid --top value: {}", top))?;
    }

    let path = PathBuf::from(&args[1]);
    let bytes = std::fs::read(&path).with_context(|| format!("read file failed: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    validate_submission(&text, config.analysis.min_submission_chars)?;

    let mut submitted = Document::submitted(text);
    if let Some(name) = path.file_name() {
        submitted.origin = plague_core::models::DocumentOrigin::Submitted {
            file_name: Some(name.to_string_lossy().to_string()),
        };
    }

    let mut sources: Vec<Arc<dyn ReferenceSource>> = Vec::new();
    let corpus_dir = parse_arg_value(&args, "--corpus")
        .map(PathBuf::from)
        .or_else(|| config.sources.corpus_dir.clone());
    if let Some(dir) = corpus_dir {
        sources.push(Arc::new(CorpusSource::new(dir)));
    }
    if let Some(results) = parse_arg_value(&args, "--web-results") {
        sources.push(Arc::new(SavedWebResults::new(
            results,
            config.sources.min_web_abstract_chars,
        )));
    }
    if sources.is_empty() {
        eprintln!("No reference sources given (use --corpus or --web-results); only the AI heuristic will run.");
    }

    let out_path = parse_arg_value(&args, "--out");
    let normalizer = Normalizer::from_config(&config.analysis)
        .with_context(|| format!("failed to load lexicon {:?}", config.analysis.lexicon_path))?;
    let analyzer = Analyzer::new(normalizer, config)?;

    let started = Instant::now();
    let result = analyzer.analyze_with_sources(&submitted, &sources).await?;
    let elapsed_ms = started.elapsed().as_millis();

    println!("File: {}", path.display());
    print!("{}", render_analysis(&result, analyzer.config(), colour));
    println!();
    println!("Analysis time: {} ms", elapsed_ms);

    if let Some(out) = out_path {
        let json = serde_json::to_string_pretty(&result).context("serialize result failed")?;
        std::fs::write(&out, json).with_context(|| format!("write output failed: {}", out))?;
        println!("Wrote: {}", out);
    }

    Ok(())
}
