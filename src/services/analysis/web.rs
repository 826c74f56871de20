// Web Results
// Turns search results from external paper/encyclopedia APIs into pool documents

use super::sources::{ReferenceSource, SourceError};
use crate::models::{Document, DocumentOrigin};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPaper {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default, alias = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub published: Option<String>,
    pub source: String,
    #[serde(default)]
    pub url: String,
}

/// Keep papers whose abstract has more than `min_chars` characters after trimming.
pub fn prepare_web_papers(papers: &[WebPaper], min_chars: usize) -> Vec<Document> {
    papers
        .iter()
        .filter(|p| p.abstract_text.trim().chars().count() > min_chars)
        .map(|p| Document {
            title: p.title.clone(),
            text: p.abstract_text.clone(),
            origin: DocumentOrigin::Web {
                source: p.source.clone(),
                authors: p.authors.clone(),
                url: p.url.clone(),
                published: p.published.clone(),
            },
        })
        .collect()
}

/// Previously fetched search results stored as a JSON array of papers.
pub struct SavedWebResults {
    path: PathBuf,
    min_chars: usize,
}

impl SavedWebResults {
    pub fn new(path: impl Into<PathBuf>, min_chars: usize) -> Self {
        Self {
            path: path.into(),
            min_chars,
        }
    }
}

impl ReferenceSource for SavedWebResults {
    fn name(&self) -> &str {
        "web"
    }

    fn fetch(&self, _query: &str) -> Result<Vec<Document>, SourceError> {
        let raw = fs::read_to_string(&self.path)?;
        let papers: Vec<WebPaper> =
            serde_json::from_str(&raw).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(prepare_web_papers(&papers, self.min_chars))
    }
}
