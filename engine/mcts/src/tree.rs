//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Parent links are plain indices, so walking leaf to root never touches
//! ownership. Resetting truncates the arena to a fresh root and keeps its
//! capacity for the next decision.

use std::collections::HashSet;

use engine_core::Simulator;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::node::{Node, NodeId};
use crate::search::SearchError;
use crate::state::SimulationState;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree<S: Simulator> {
    /// Arena storing all nodes
    nodes: Vec<Node<S>>,

    /// Root node index (always 0)
    root: NodeId,
}

impl<S: Simulator> SearchTree<S> {
    /// Create a new tree with the given root state.
    pub fn new(root_state: SimulationState<S>) -> Self {
        Self {
            nodes: vec![Node::new(NodeId::NONE, root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and start over from `root_state`.
    pub fn reset(&mut self, root_state: SimulationState<S>) {
        self.nodes.clear();
        self.nodes.push(Node::new(NodeId::NONE, root_state));
        self.root = NodeId(0);
    }

    /// Append `state` as a new child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, state: SimulationState<S>) -> NodeId {
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(parent, state));
        self.get_mut(parent).children.push(child_id);
        child_id
    }

    /// Moves already expanded out of `node`.
    pub fn tried_moves(&self, node: NodeId) -> HashSet<S::Move> {
        self.get(node)
            .children
            .iter()
            .filter_map(|&child| self.get(child).state.from_move)
            .collect()
    }

    /// True when every searchable move of `node` has a child.
    ///
    /// Recomputed from the simulator on every call.
    pub fn fully_expanded(&self, node: NodeId, simulator: &S) -> bool {
        let node = self.get(node);
        let legal = simulator.searchable_moves(&node.state.snapshot, node.state.agent);
        legal.len() <= node.children.len()
    }

    /// UCB1 best child of `node`; ties are broken uniformly at random.
    pub fn best_child(
        &self,
        node: NodeId,
        exploration: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<NodeId, SearchError> {
        let parent = self.get(node);
        let scored: Vec<(NodeId, f32)> = parent
            .children
            .iter()
            .map(|&id| (id, self.get(id).ucb_score(parent.visits, exploration)))
            .collect();

        let best = scored
            .iter()
            .map(|(_, score)| *score)
            .fold(f32::NEG_INFINITY, f32::max);
        let ties: Vec<NodeId> = scored
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(id, _)| id)
            .collect();

        ties.choose(rng).copied().ok_or(SearchError::FatalSelection)
    }

    /// Propagate a rollout reward from `leaf` to the root.
    ///
    /// Every node on the path gains one visit, the discounted rollout reward,
    /// and its own one-step reward.
    pub fn backup(&mut self, leaf: NodeId, reward: f32, discount: f32) {
        let mut current = leaf;
        while current.is_some() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.total_reward += reward * discount;
            node.total_reward += node.state.reward();
            current = node.parent;
        }
    }

    /// Edges between `node` and the root.
    pub fn depth(&self, node: NodeId) -> u32 {
        let mut depth = 0;
        let mut current = self.get(node).parent;
        while current.is_some() {
            depth += 1;
            current = self.get(current).parent;
        }
        depth
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.mean_reward(),
            max_depth: (0..self.nodes.len())
                .map(|i| self.depth(NodeId(i as u32)))
                .max()
                .unwrap_or(0),
        }
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
