//! Typed simulator trait consumed by the search engine
//!
//! The search never looks inside a snapshot. It only asks the simulator which
//! moves an agent may take and what the world looks like after one of them.

use std::fmt::Debug;
use std::hash::Hash;

/// Index of an agent inside a snapshot (both teams share one index space)
pub type AgentIndex = usize;

/// Main trait for turn-based grid games the search can drive
///
/// # Type Parameters
///
/// * `Snapshot` - Full game state at a turn boundary, treated as immutable
/// * `Move` - Atomic action, small and `Copy`
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Step {
///     Left,
///     Right,
///     Wait,
/// }
///
/// #[derive(Debug)]
/// struct Corridor {
///     length: i32,
/// }
///
/// impl Simulator for Corridor {
///     type Snapshot = i32;
///     type Move = Step;
///
///     const NOOP: Step = Step::Wait;
///
///     fn legal_moves(&self, position: &i32, _agent: AgentIndex) -> Vec<Step> {
///         let mut moves = vec![Step::Wait];
///         if *position > 0 {
///             moves.push(Step::Left);
///         }
///         if *position + 1 < self.length {
///             moves.push(Step::Right);
///         }
///         moves
///     }
///
///     fn generate_successor(&self, position: &i32, _agent: AgentIndex, mv: Step) -> i32 {
///         match mv {
///             Step::Left => position - 1,
///             Step::Right => position + 1,
///             Step::Wait => *position,
///         }
///     }
/// }
///
/// let corridor = Corridor { length: 3 };
/// assert_eq!(corridor.searchable_moves(&0, 0), vec![Step::Right]);
/// ```
pub trait Simulator: Send + Sync + Debug + 'static {
    /// Game state type - cloned, never mutated in place by the search
    type Snapshot: Clone + Debug + Send + Sync + 'static;

    /// Move type - equality-comparable and hashable for tried-move sets
    type Move: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The distinguished "do nothing" move, excluded from all search consideration
    const NOOP: Self::Move;

    /// Every move the rules allow `agent` to take at `snapshot`, no-op included
    fn legal_moves(&self, snapshot: &Self::Snapshot, agent: AgentIndex) -> Vec<Self::Move>;

    /// Deterministic successor of `snapshot` after `agent` plays `mv`
    fn generate_successor(
        &self,
        snapshot: &Self::Snapshot,
        agent: AgentIndex,
        mv: Self::Move,
    ) -> Self::Snapshot;

    /// Legal moves with the no-op removed, in the simulator's order
    fn searchable_moves(&self, snapshot: &Self::Snapshot, agent: AgentIndex) -> Vec<Self::Move> {
        self.legal_moves(snapshot, agent)
            .into_iter()
            .filter(|mv| *mv != Self::NOOP)
            .collect()
    }

    /// Distance from `agent` to a safe anchor point (usually its spawn).
    ///
    /// Used only by fallback move selection. `None` means the game has no
    /// notion of an anchor.
    fn anchor_distance(&self, _snapshot: &Self::Snapshot, _agent: AgentIndex) -> Option<u32> {
        None
    }
}
