//! Core traits and types for the capture-grid decision engine
//!
//! This crate provides the narrow interfaces the search consumes:
//! - `Simulator`: legal moves and successor generation for a snapshot
//! - `Evaluator`: heuristic score of one move from one snapshot
//! - `LinearEvaluator`: feature-weight implementation of `Evaluator`

pub mod evaluation;
pub mod typed;

// Re-export main types for convenience
pub use evaluation::{Evaluator, FeatureExtractor, Features, LinearEvaluator, Weights};
pub use typed::{AgentIndex, Simulator};
