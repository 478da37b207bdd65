//! MCTS tree node representation.
//!
//! Each node owns the simulation state reached by its move from the parent
//! and the visit statistics UCB1 selection reads.

use engine_core::Simulator;

use crate::state::SimulationState;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug)]
pub struct Node<S: Simulator> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    pub state: SimulationState<S>,

    /// Children in expansion order. Empty until the node is expanded.
    pub children: Vec<NodeId>,

    /// Number of backups that passed through this node
    pub visits: u32,

    /// Sum of discounted rollout rewards and local rewards
    pub total_reward: f32,
}

impl<S: Simulator> Node<S> {
    pub fn new(parent: NodeId, state: SimulationState<S>) -> Self {
        Self {
            parent,
            state,
            children: Vec::new(),
            visits: 0,
            total_reward: 0.0,
        }
    }

    /// Mean reward, 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f32
        }
    }

    /// UCB1 score as a child of a parent with `parent_visits` visits.
    ///
    /// `mean + c * sqrt(ln(2 * parent_visits) / visits)`
    ///
    /// An unvisited child has no mean: it scores `+inf` while exploring and
    /// `-inf` under pure exploitation (`c == 0`).
    #[inline]
    pub fn ucb_score(&self, parent_visits: u32, exploration: f32) -> f32 {
        if self.visits == 0 {
            return if exploration > 0.0 {
                f32::INFINITY
            } else {
                f32::NEG_INFINITY
            };
        }
        let visits = self.visits as f32;
        let exploit = self.total_reward / visits;
        if exploration == 0.0 {
            return exploit;
        }
        let explore = ((2.0 * parent_visits as f32).ln() / visits).sqrt();
        exploit + exploration * explore
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
