// Reference Sources
// Parallel gathering of comparison documents from independent collaborators
//
// Each source runs on the blocking pool under its own timeout. A source that fails or
// times out contributes nothing; results are reassembled in source order.

use crate::models::Document;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed source data: {0}")]
    Malformed(String),
}

/// Supplies raw comparison documents for a search query. Implementations may block.
pub trait ReferenceSource: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self, query: &str) -> Result<Vec<Document>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Ok,
    Failed(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub documents: usize,
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Default)]
pub struct GatheredReferences {
    pub documents: Vec<Document>,
    pub reports: Vec<SourceReport>,
}

impl GatheredReferences {
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(|r| r.status != SourceStatus::Ok)
    }
}

/// Query every source concurrently and wait for all of them or their timeouts.
pub async fn gather_references(
    sources: &[Arc<dyn ReferenceSource>],
    query: &str,
    timeout: Duration,
) -> GatheredReferences {
    let started = Instant::now();
    let mut join_set = JoinSet::new();

    for (idx, source) in sources.iter().enumerate() {
        let source = Arc::clone(source);
        let query = query.to_string();
        join_set.spawn(async move {
            let name = source.name().to_string();
            let handle = tokio::task::spawn_blocking(move || source.fetch(&query));
            let outcome = match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(Ok(docs))) => Ok(docs),
                Ok(Ok(Err(e))) => Err(SourceStatus::Failed(e.to_string())),
                Ok(Err(join_err)) => Err(SourceStatus::Failed(format!("task failed: {}", join_err))),
                Err(_) => Err(SourceStatus::TimedOut),
            };
            (idx, name, outcome)
        });
    }

    let mut slots: Vec<Option<(String, Result<Vec<Document>, SourceStatus>)>> =
        (0..sources.len()).map(|_| None).collect();
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok((idx, name, outcome)) => slots[idx] = Some((name, outcome)),
            Err(e) => warn!("[SOURCES] gather task failed: {}", e),
        }
    }

    let mut gathered = GatheredReferences::default();
    for (idx, slot) in slots.into_iter().enumerate() {
        let (name, outcome) = slot.unwrap_or_else(|| {
            (
                sources[idx].name().to_string(),
                Err(SourceStatus::Failed("task aborted".to_string())),
            )
        });
        match outcome {
            Ok(docs) => {
                info!("[SOURCES] {} returned {} documents", name, docs.len());
                gathered.reports.push(SourceReport {
                    name,
                    documents: docs.len(),
                    status: SourceStatus::Ok,
                });
                gathered.documents.extend(docs);
            }
            Err(status) => {
                warn!("[SOURCES] {} contributed nothing: {:?}", name, status);
                gathered.reports.push(SourceReport {
                    name,
                    documents: 0,
                    status,
                });
            }
        }
    }

    info!(
        "[SOURCES] gathered documents={} sources={} elapsed_ms={}",
        gathered.documents.len(),
        sources.len(),
        started.elapsed().as_millis()
    );
    gathered
}
