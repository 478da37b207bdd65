//! Defensive feature set.
//!
//! Features are measured on the successor reached by the move, except
//! `reverse`, which compares the move against the direction the agent was
//! facing before it.

use engine_config::EvaluatorConfig;
use engine_core::{AgentIndex, FeatureExtractor, Features, LinearEvaluator, Simulator, Weights};

use crate::{Capture, Direction, GameState};

pub const ON_DEFENSE: &str = "onDefense";
pub const NUM_INVADERS: &str = "numInvaders";
pub const INVADER_DISTANCE: &str = "invaderDistance";
pub const STOP: &str = "stop";
pub const REVERSE: &str = "reverse";

/// Guard the home half: stay a ghost, chase visible invaders, keep moving.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseFeatures;

impl FeatureExtractor<Capture> for DefenseFeatures {
    fn features(
        &self,
        sim: &Capture,
        snapshot: &GameState,
        agent: AgentIndex,
        mv: Direction,
    ) -> Features {
        let successor = sim.generate_successor(snapshot, agent, mv);
        let my_pos = successor.position(agent);
        let mut features = Features::new();

        features.set(
            ON_DEFENSE,
            if successor.is_pacman(agent) { 0.0 } else { 1.0 },
        );

        let invaders: Vec<_> = successor
            .opponents(agent)
            .filter(|&other| successor.is_pacman(other))
            .filter_map(|other| successor.visible_position(agent, other, sim.sight_range()))
            .collect();
        features.set(NUM_INVADERS, invaders.len() as f32);

        if !invaders.is_empty() {
            let nearest = invaders
                .iter()
                .filter_map(|pos| sim.maze_distance(my_pos, *pos))
                .min()
                .unwrap_or(0);
            features.set(INVADER_DISTANCE, nearest as f32);
        }

        if mv == Direction::Stop {
            features.set(STOP, 1.0);
        }
        if mv == snapshot.agent(agent).direction.reverse() {
            features.set(REVERSE, 1.0);
        }

        features
    }
}

/// Linear evaluator over [`DefenseFeatures`].
pub type DefenseEvaluator = LinearEvaluator<DefenseFeatures>;

/// Built-in defensive weights.
pub fn defense_weights() -> Weights {
    to_weights(&EvaluatorConfig::default())
}

/// Defensive evaluator using the weight table from `config`.
pub fn defense_evaluator(config: &EvaluatorConfig) -> DefenseEvaluator {
    LinearEvaluator::new(DefenseFeatures, to_weights(config))
}

fn to_weights(config: &EvaluatorConfig) -> Weights {
    config
        .weights
        .iter()
        .map(|(name, weight)| (name.clone(), *weight as f32))
        .collect()
}
