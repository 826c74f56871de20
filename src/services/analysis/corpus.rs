// Corpus Loader
// Reads the local reference corpus: <root>/<category>/<name>.txt

use super::sources::{ReferenceSource, SourceError};
use crate::models::{Document, DocumentOrigin};
use crate::services::error::{EngineError, EngineResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// "neural_nets_overview" -> "Neural Nets Overview". A letter starts a word unless
/// it follows another letter; everything else in the word is lowercased.
pub fn title_from_file_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_is_letter = false;
    for ch in stem.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    paths.sort();
    Ok(paths)
}

fn is_txt(path: &Path) -> bool {
    path.is_file() && path.extension().map_or(false, |ext| ext == "txt")
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Every non-blank `.txt` file one level below a category directory, in path order.
/// A missing root is an empty corpus.
pub fn load_corpus(root: &Path) -> EngineResult<Vec<Document>> {
    if !root.exists() {
        warn!("[CORPUS] Corpus path does not exist: {}", root.display());
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    for category_dir in sorted_entries(root).map_err(|e| EngineError::io(root, e))? {
        if !category_dir.is_dir() {
            continue;
        }
        let category = category_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let files = match sorted_entries(&category_dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("[CORPUS] Skipping unreadable category {}: {}", category_dir.display(), e);
                continue;
            }
        };

        for path in files.into_iter().filter(|p| is_txt(p)) {
            let text = match read_lossy(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("[CORPUS] Error loading {}: {}", path.display(), e);
                    continue;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            documents.push(Document {
                title: title_from_file_stem(&stem),
                text,
                origin: DocumentOrigin::Corpus {
                    category: category.clone(),
                    path: Some(path.display().to_string()),
                },
            });
        }
    }

    debug!("[CORPUS] Loaded {} documents from {}", documents.len(), root.display());
    Ok(documents)
}

/// Flat folder of `.txt` files for pairwise comparison; titles are the file names.
pub fn load_text_folder(dir: &Path) -> EngineResult<Vec<Document>> {
    let mut documents = Vec::new();
    for path in sorted_entries(dir).map_err(|e| EngineError::io(dir, e))? {
        if !is_txt(&path) {
            continue;
        }
        let text = read_lossy(&path).map_err(|e| EngineError::io(&path, e))?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        documents.push(Document {
            title: file_name,
            text,
            origin: DocumentOrigin::Corpus {
                category: dir
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: Some(path.display().to_string()),
            },
        });
    }
    Ok(documents)
}

/// The local corpus as a reference source. It ignores the query: every corpus document is compared.
pub struct CorpusSource {
    root: PathBuf,
}

impl CorpusSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReferenceSource for CorpusSource {
    fn name(&self) -> &str {
        "corpus"
    }

    fn fetch(&self, _query: &str) -> Result<Vec<Document>, SourceError> {
        load_corpus(&self.root).map_err(|e| SourceError::Unavailable(e.to_string()))
    }
}
