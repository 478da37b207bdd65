//! Snapshot plus the bookkeeping the search attaches to it.

use std::collections::HashSet;
use std::fmt;

use engine_core::{AgentIndex, Evaluator, Simulator};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::search::SearchError;

/// A snapshot seen from one agent, with a remaining-depth budget.
///
/// `value` is the evaluator score of the move that produced this state, so
/// it doubles as the state's one-step reward.
pub struct SimulationState<S: Simulator> {
    pub snapshot: S::Snapshot,
    pub agent: AgentIndex,
    pub value: f32,
    pub remaining_depth: u32,
    /// Most recent move generated out of this state
    pub last_move: Option<S::Move>,
    /// Move that produced this state (None for the root)
    pub from_move: Option<S::Move>,
}

impl<S: Simulator> SimulationState<S> {
    /// Root state for a decision.
    pub fn new(snapshot: S::Snapshot, agent: AgentIndex, depth: u32) -> Self {
        Self {
            snapshot,
            agent,
            value: 0.0,
            remaining_depth: depth,
            last_move: None,
            from_move: None,
        }
    }

    /// Heuristically best successor among the moves not in `tried`.
    ///
    /// Ties between equally scored moves are broken uniformly at random.
    pub fn next<E>(
        &mut self,
        simulator: &S,
        evaluator: &E,
        tried: &HashSet<S::Move>,
        rng: &mut ChaCha20Rng,
    ) -> Result<Self, SearchError>
    where
        E: Evaluator<S> + ?Sized,
    {
        if self.terminal() {
            return Err(SearchError::InvalidState(
                "next() called on a terminal state".to_string(),
            ));
        }

        let scored: Vec<(S::Move, f32)> = simulator
            .searchable_moves(&self.snapshot, self.agent)
            .into_iter()
            .filter(|mv| !tried.contains(mv))
            .map(|mv| {
                let score = evaluator.evaluate(simulator, &self.snapshot, self.agent, mv);
                (mv, score)
            })
            .collect();

        if scored.is_empty() {
            return Err(SearchError::ExhaustedMoves);
        }

        let best = scored
            .iter()
            .map(|(_, score)| *score)
            .fold(f32::NEG_INFINITY, f32::max);
        let ties: Vec<(S::Move, f32)> = scored
            .into_iter()
            .filter(|(_, score)| *score == best)
            .collect();
        let (mv, score) = ties.choose(rng).copied().ok_or_else(|| {
            SearchError::InvalidState("evaluator returned no comparable score".to_string())
        })?;

        let snapshot = simulator.generate_successor(&self.snapshot, self.agent, mv);
        self.last_move = Some(mv);

        Ok(Self {
            snapshot,
            agent: self.agent,
            value: score,
            remaining_depth: self.remaining_depth - 1,
            last_move: None,
            from_move: Some(mv),
        })
    }

    #[inline]
    pub fn terminal(&self) -> bool {
        self.remaining_depth == 0
    }

    #[inline]
    pub fn reward(&self) -> f32 {
        self.value
    }
}

impl<S: Simulator> Clone for SimulationState<S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            agent: self.agent,
            value: self.value,
            remaining_depth: self.remaining_depth,
            last_move: self.last_move,
            from_move: self.from_move,
        }
    }
}

impl<S: Simulator> fmt::Debug for SimulationState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationState")
            .field("agent", &self.agent)
            .field("value", &self.value)
            .field("remaining_depth", &self.remaining_depth)
            .field("last_move", &self.last_move)
            .field("from_move", &self.from_move)
            .finish_non_exhaustive()
    }
}
