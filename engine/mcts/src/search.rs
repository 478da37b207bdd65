//! MCTS search implementation.
//!
//! Each iteration runs:
//! 1. Selection: descend with UCB1 until a terminal node or a node with an
//!    untried move
//! 2. Expansion: add exactly one child for the heuristically best untried move
//! 3. Rollout: play the evaluator's greedy moves from a copy of the leaf state
//!    until the depth budget runs out
//! 4. Backup: add the discounted rollout reward and each node's own reward
//!    along the path to the root
//!
//! A failing iteration is logged and skipped; the search keeps going.

use std::collections::HashSet;

use engine_core::{AgentIndex, Evaluator, Simulator};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::state::SimulationState;
use crate::tree::SearchTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No untried legal move left to expand")]
    ExhaustedMoves,

    #[error("Best-child selection on a node without children")]
    FatalSelection,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No legal moves available")]
    NoLegalMoves,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Move of the root child picked with pure exploitation
    pub best_move: M,

    /// Mean reward of that child
    pub value: f32,

    /// Iterations attempted
    pub iterations: u32,

    /// Iterations that failed and were skipped
    pub failed_iterations: u32,
}

/// MCTS search state for one decision.
pub struct MctsSearch<'a, S: Simulator, E: ?Sized> {
    tree: SearchTree<S>,
    simulator: &'a S,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, S, E> MctsSearch<'a, S, E>
where
    S: Simulator,
    E: Evaluator<S> + ?Sized,
{
    /// Create a new search rooted at `snapshot`, deciding for `agent`.
    pub fn new(
        simulator: &'a S,
        evaluator: &'a E,
        config: MctsConfig,
        snapshot: S::Snapshot,
        agent: AgentIndex,
    ) -> Self {
        let root = SimulationState::new(snapshot, agent, config.rollout_depth);
        Self::with_tree(simulator, evaluator, config, SearchTree::new(root))
    }

    /// Search over an existing (usually freshly reset) tree.
    pub fn with_tree(
        simulator: &'a S,
        evaluator: &'a E,
        config: MctsConfig,
        tree: SearchTree<S>,
    ) -> Self {
        Self {
            tree,
            simulator,
            evaluator,
            config,
        }
    }

    /// Run the configured number of iterations, then pick the best root child.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<S::Move>, SearchError> {
        let root_id = self.tree.root();
        let root = self.tree.get(root_id);
        if self
            .simulator
            .searchable_moves(&root.state.snapshot, root.state.agent)
            .is_empty()
        {
            return Err(SearchError::NoLegalMoves);
        }

        let mut failed_iterations = 0;
        for iteration in 0..self.config.iterations {
            if let Err(e) = self.simulate(rng) {
                warn!(iteration, error = %e, "MCTS iteration failed, skipping");
                failed_iterations += 1;
            }
        }

        let best = self.tree.best_child(root_id, 0.0, rng)?;
        let child = self.tree.get(best);
        let best_move = child.state.from_move.ok_or_else(|| {
            SearchError::InvalidState("root child has no originating move".to_string())
        })?;

        let stats = self.tree.stats();
        debug!(
            best_move = ?best_move,
            value = child.mean_reward(),
            visits = child.visits,
            nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            failed_iterations,
            "MCTS search complete"
        );

        Ok(SearchResult {
            best_move,
            value: child.mean_reward(),
            iterations: self.config.iterations,
            failed_iterations,
        })
    }

    /// Run a single iteration (select -> rollout -> backup).
    pub fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf = self.select(rng)?;
        let reward = self.rollout(self.tree.get(leaf).state.clone(), rng)?;
        self.tree
            .backup(leaf, reward, self.config.effective_discount());

        trace!(
            leaf = leaf.0,
            depth = self.tree.depth(leaf),
            reward,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Tree policy: descend to a terminal node or expand a new child.
    pub fn select(&mut self, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();
        loop {
            if self.tree.get(current).state.terminal() {
                return Ok(current);
            }
            if !self.tree.fully_expanded(current, self.simulator) {
                return self.expand(current, rng);
            }
            current = self
                .tree
                .best_child(current, self.config.exploration, rng)?;
        }
    }

    /// Add one child for the best move not yet expanded out of `node`.
    pub fn expand(&mut self, node: NodeId, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let tried = self.tree.tried_moves(node);
        let child = self
            .tree
            .get_mut(node)
            .state
            .next(self.simulator, self.evaluator, &tried, rng)?;
        Ok(self.tree.add_child(node, child))
    }

    /// Default policy: follow the evaluator from a detached copy of a state
    /// and return the reward of the final state.
    pub fn rollout(
        &self,
        mut state: SimulationState<S>,
        rng: &mut ChaCha20Rng,
    ) -> Result<f32, SearchError> {
        let untried = HashSet::new();
        while !state.terminal() {
            state = state.next(self.simulator, self.evaluator, &untried, rng)?;
        }
        Ok(state.reward())
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Give the tree back so its allocation can be reused.
    pub fn into_tree(self) -> SearchTree<S> {
        self.tree
    }
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<S, E>(
    simulator: &S,
    evaluator: &E,
    config: MctsConfig,
    snapshot: S::Snapshot,
    agent: AgentIndex,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<S::Move>, SearchError>
where
    S: Simulator,
    E: Evaluator<S> + ?Sized,
{
    let mut search = MctsSearch::new(simulator, evaluator, config, snapshot, agent);
    search.run(rng)
}
