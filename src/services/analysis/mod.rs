// Analysis Module
// End-to-end plagiarism analysis built on the similarity and detection layers:
// - orchestrator: submitted document vs reference pool
// - aggregation: headline statistics over retained matches
// - sources: parallel reference gathering with per-source timeouts
// - corpus: local corpus directory loader
// - web: preparation of saved web search results
// - keywords: search query extraction
// - report: terminal rendering

pub mod aggregation;
pub mod corpus;
pub mod keywords;
pub mod orchestrator;
pub mod report;
pub mod sources;
pub mod web;

pub use aggregation::{summarize_matches, MatchStatistics};
pub use corpus::{load_corpus, load_text_folder, title_from_file_stem, CorpusSource};
pub use keywords::{extract_query, ranked_phrases};
pub use orchestrator::{validate_submission, Analyzer};
pub use report::{render_analysis, render_pairwise};
pub use sources::{
    gather_references, GatheredReferences, ReferenceSource, SourceError, SourceReport, SourceStatus,
};
pub use web::{prepare_web_papers, SavedWebResults, WebPaper};
