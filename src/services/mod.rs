// PLAGUE Core Services
// Normalization, vector space scoring, heuristics and analysis orchestration

pub mod error;
pub mod text_processor;
pub mod normalizer;
pub mod config_store;
pub mod similarity;
pub mod detection;
pub mod analysis;

pub use error::{EngineError, EngineResult, ErrorKind};
pub use config_store::*;
pub use normalizer::{NlpResources, Normalizer};
pub use similarity::compare_documents;
pub use detection::score_text;
pub use analysis::{validate_submission, Analyzer};
