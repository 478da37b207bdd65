//! Per-turn decision making on top of the search.
//!
//! [`MctsAgent`] keeps one tree for its whole lifetime and resets it at the
//! start of every decision. When the search cannot produce a usable move the
//! configured fallback picks one, so a decision only fails when the agent has
//! no searchable move at all.

use engine_config::FallbackKind;
use engine_core::{AgentIndex, Evaluator, Simulator};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, warn};

use crate::config::MctsConfig;
use crate::search::{run_mcts, MctsSearch, SearchError, SearchResult};
use crate::state::SimulationState;
use crate::tree::SearchTree;

/// Search-driven agent owning its simulator, evaluator, RNG and tree.
pub struct MctsAgent<S: Simulator, E> {
    simulator: S,
    evaluator: E,
    config: MctsConfig,
    rng: ChaCha20Rng,
    tree: Option<SearchTree<S>>,
}

impl<S, E> MctsAgent<S, E>
where
    S: Simulator,
    E: Evaluator<S>,
{
    pub fn new(simulator: S, evaluator: E, config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            simulator,
            evaluator,
            config,
            rng,
            tree: None,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Tree left behind by the most recent decision.
    pub fn last_tree(&self) -> Option<&SearchTree<S>> {
        self.tree.as_ref()
    }

    /// Pick a move for `agent` at `snapshot` using `budget` iterations.
    pub fn decide(
        &mut self,
        snapshot: &S::Snapshot,
        agent: AgentIndex,
        budget: u32,
    ) -> Result<S::Move, SearchError> {
        let config = self.config.clone().with_iterations(budget);
        let root = SimulationState::new(snapshot.clone(), agent, config.rollout_depth);
        let tree = match self.tree.take() {
            Some(mut tree) => {
                tree.reset(root);
                tree
            }
            None => SearchTree::new(root),
        };

        let mut search = MctsSearch::with_tree(&self.simulator, &self.evaluator, config, tree);
        let outcome = search.run(&mut self.rng);
        self.tree = Some(search.into_tree());

        resolve(&self.simulator, snapshot, agent, self.config.fallback, outcome)
    }
}

/// One-shot decision without a persistent agent.
pub fn decide<S, E>(
    simulator: &S,
    evaluator: &E,
    config: &MctsConfig,
    snapshot: &S::Snapshot,
    agent: AgentIndex,
    budget: u32,
    rng: &mut ChaCha20Rng,
) -> Result<S::Move, SearchError>
where
    S: Simulator,
    E: Evaluator<S> + ?Sized,
{
    let search_config = config.clone().with_iterations(budget);
    let outcome = run_mcts(
        simulator,
        evaluator,
        search_config,
        snapshot.clone(),
        agent,
        rng,
    );
    resolve(simulator, snapshot, agent, config.fallback, outcome)
}

/// Move used when the search yields nothing usable.
pub fn fallback_move<S: Simulator>(
    simulator: &S,
    snapshot: &S::Snapshot,
    agent: AgentIndex,
    fallback: FallbackKind,
) -> Result<S::Move, SearchError> {
    let legal = simulator.searchable_moves(snapshot, agent);
    let first = legal.first().copied().ok_or(SearchError::NoLegalMoves)?;

    let chosen = match fallback {
        FallbackKind::FirstLegal => first,
        FallbackKind::TowardAnchor => legal
            .iter()
            .copied()
            .min_by_key(|mv| {
                let next = simulator.generate_successor(snapshot, agent, *mv);
                simulator.anchor_distance(&next, agent).unwrap_or(u32::MAX)
            })
            .unwrap_or(first),
    };
    Ok(chosen)
}

fn resolve<S: Simulator>(
    simulator: &S,
    snapshot: &S::Snapshot,
    agent: AgentIndex,
    fallback: FallbackKind,
    outcome: Result<SearchResult<S::Move>, SearchError>,
) -> Result<S::Move, SearchError> {
    match outcome {
        Ok(result) if simulator.searchable_moves(snapshot, agent).contains(&result.best_move) => {
            debug!(
                agent,
                best_move = ?result.best_move,
                value = result.value,
                failed = result.failed_iterations,
                "decision"
            );
            Ok(result.best_move)
        }
        Ok(result) => {
            warn!(agent, best_move = ?result.best_move, %fallback, "search picked an illegal move, using fallback");
            fallback_move(simulator, snapshot, agent, fallback)
        }
        Err(SearchError::NoLegalMoves) => Err(SearchError::NoLegalMoves),
        Err(e) => {
            warn!(agent, error = %e, %fallback, "search failed, using fallback");
            fallback_move(simulator, snapshot, agent, fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Broken, Flat, Line, Step, Toward};

    #[test]
    fn test_agent_decides_legal_move() {
        let mut agent = MctsAgent::new(Line::new(10), Toward(9), MctsConfig::for_testing());
        let mv = agent.decide(&4, 0, 16).unwrap();
        assert_eq!(mv, Step::Right);
        assert!(agent.last_tree().is_some());
    }

    #[test]
    fn test_agent_resets_tree_between_decisions() {
        let mut agent = MctsAgent::new(Line::new(10), Toward(0), MctsConfig::for_testing());
        agent.decide(&4, 0, 20).unwrap();
        let mv = agent.decide(&7, 0, 3).unwrap();
        assert_eq!(mv, Step::Left);

        let tree = agent.last_tree().unwrap();
        assert_eq!(tree.get(tree.root()).state.snapshot, 7);
        assert_eq!(tree.get(tree.root()).visits, 3);
        assert!(tree.len() <= 4);
    }

    #[test]
    fn test_budget_one_with_single_move() {
        let mut agent = MctsAgent::new(Line::new(2), Flat, MctsConfig::for_testing());
        assert_eq!(agent.decide(&1, 0, 1).unwrap(), Step::Left);
    }

    #[test]
    fn test_no_legal_moves_escapes() {
        let mut agent = MctsAgent::new(Line::new(1), Flat, MctsConfig::for_testing());
        let err = agent.decide(&0, 0, 4).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves));
    }

    #[test]
    fn test_failed_search_uses_first_legal() {
        let mut agent = MctsAgent::new(Line::new(10), Broken, MctsConfig::for_testing());
        assert_eq!(agent.decide(&4, 0, 4).unwrap(), Step::Left);
    }

    #[test]
    fn test_failed_search_uses_toward_anchor() {
        let config = MctsConfig::for_testing().with_fallback(FallbackKind::TowardAnchor);
        let mut agent = MctsAgent::new(Line::new(10), Broken, config);
        assert_eq!(agent.decide(&4, 0, 4).unwrap(), Step::Left);

        // Zero budget never produces a child either
        let config = MctsConfig::for_testing().with_fallback(FallbackKind::TowardAnchor);
        let mut agent = MctsAgent::new(Line::new(10), Toward(9), config);
        assert_eq!(agent.decide(&4, 0, 0).unwrap(), Step::Left);
    }

    #[test]
    fn test_fallback_move() {
        let line = Line::new(10);
        assert_eq!(
            fallback_move(&line, &0, 0, FallbackKind::FirstLegal).unwrap(),
            Step::Right
        );
        assert_eq!(
            fallback_move(&line, &5, 0, FallbackKind::FirstLegal).unwrap(),
            Step::Left
        );
        assert_eq!(
            fallback_move(&line, &5, 0, FallbackKind::TowardAnchor).unwrap(),
            Step::Left
        );
        assert!(matches!(
            fallback_move(&Line::new(1), &0, 0, FallbackKind::FirstLegal),
            Err(SearchError::NoLegalMoves)
        ));
    }

    #[test]
    fn test_free_decide() {
        let line = Line::new(10);
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let config = MctsConfig::for_testing();
        let mv = decide(&line, &Toward(0), &config, &3, 0, 12, &mut rng).unwrap();
        assert_eq!(mv, Step::Left);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let config = MctsConfig::for_testing().with_seed(77);
        let mut a = MctsAgent::new(Line::new(10), Flat, config.clone());
        let mut b = MctsAgent::new(Line::new(10), Flat, config);
        for position in [1, 4, 8] {
            assert_eq!(
                a.decide(&position, 0, 10).unwrap(),
                b.decide(&position, 0, 10).unwrap()
            );
        }
    }
}
