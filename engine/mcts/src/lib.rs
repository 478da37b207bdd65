//! Monte Carlo Tree Search (MCTS) move selection for turn-based grid games.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`Simulator`](engine_core::Simulator)
//! trait, guided by any [`Evaluator`](engine_core::Evaluator).
//!
//! # Overview
//!
//! The search builds a tree rooted at the live snapshot, one node per
//! iteration:
//!
//! 1. **Selection**: descend with UCB1 until a terminal node or a node that
//!    still has an untried move
//! 2. **Expansion**: add one child for the best-scoring untried move
//! 3. **Rollout**: follow the evaluator's choices from a copy of the new
//!    state until the depth budget is spent
//! 4. **Backup**: walk back to the root adding the discounted rollout reward
//!    and each node's own one-step reward
//!
//! After the budget is spent the root child with the best mean reward wins.
//!
//! # Usage
//!
//! ```rust
//! use games_capture::{defense_evaluator, Capture, DEFAULT_LAYOUT};
//! use engine_config::EvaluatorConfig;
//! use mcts::{MctsAgent, MctsConfig};
//!
//! let game = Capture::from_text(DEFAULT_LAYOUT).unwrap();
//! let state = game.initial_state();
//! let evaluator = defense_evaluator(&EvaluatorConfig::default());
//!
//! let mut agent = MctsAgent::new(game, evaluator, MctsConfig::for_testing());
//! let mv = agent.decide(&state, 0, 16).unwrap();
//! println!("Agent 0 moves {mv:?}");
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: iterations per decision (default: 16)
//! - `exploration`: UCB1 exploration scalar (default: 1/√2)
//! - `discount_factor` / `discount_levels`: weight of the rollout reward in
//!   backup (default: 0, local rewards only)
//! - `rollout_depth`: simulated moves per decision (default: 5)
//! - `fallback`: move used when the search yields nothing (default: first legal)
//!
//! Defaults come from `config.defaults.toml`; [`MctsConfig::load`] reads
//! `config.toml` and `CAPTURE_SEARCH_*` environment overrides.

pub mod agent;
pub mod config;
pub mod node;
pub mod search;
pub mod state;
pub mod tree;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use agent::{decide, fallback_move, MctsAgent};
pub use config::MctsConfig;
pub use engine_config::FallbackKind;
pub use node::{Node, NodeId};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use state::SimulationState;
pub use tree::{SearchTree, TreeStats};
