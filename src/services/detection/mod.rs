// Detection Module
// Rule-based signals about how a text was written. Only the AI-likelihood heuristic lives here.

pub mod heuristic;

pub use heuristic::{score_text, TOO_SHORT_REASON};
