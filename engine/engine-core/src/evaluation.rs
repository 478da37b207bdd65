//! Heuristic move evaluation.
//!
//! An [`Evaluator`] scores a single move from a snapshot for one agent. The
//! search uses it twice: to pick the locally best move while expanding and
//! rolling out, and as the per-step reward stored on each simulated state.
//!
//! [`LinearEvaluator`] is the standard implementation: a feature extractor
//! produces named feature values for the successor reached by the move, and
//! the score is their dot product with a weight table. Features missing from
//! the weight table (or weights missing from the features) contribute zero.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::typed::{AgentIndex, Simulator};

/// Trait for move evaluators.
pub trait Evaluator<S: Simulator>: Send + Sync {
    /// Score `mv` played by `agent` at `snapshot`. Higher is better.
    fn evaluate(&self, sim: &S, snapshot: &S::Snapshot, agent: AgentIndex, mv: S::Move) -> f32;
}

/// Named feature values for one (snapshot, move) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    values: BTreeMap<&'static str, f32>,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: f32) {
        self.values.insert(name, value);
    }

    /// Feature value, zero when unset.
    pub fn get(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    /// Dot product with a weight table.
    pub fn dot(&self, weights: &Weights) -> f32 {
        self.iter()
            .map(|(name, value)| value * weights.get(name))
            .sum()
    }
}

/// Feature weights keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Weights {
    values: BTreeMap<String, f32>,
}

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add or replace one weight.
    pub fn with(mut self, name: impl Into<String>, weight: f32) -> Self {
        self.values.insert(name.into(), weight);
        self
    }

    /// Weight for `name`, zero when unset.
    pub fn get(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for Weights {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Produces the features a [`LinearEvaluator`] weighs.
pub trait FeatureExtractor<S: Simulator>: Send + Sync {
    fn features(&self, sim: &S, snapshot: &S::Snapshot, agent: AgentIndex, mv: S::Move)
        -> Features;
}

/// Linear feature-weight evaluator: `score = features · weights`.
#[derive(Debug, Clone)]
pub struct LinearEvaluator<F> {
    extractor: F,
    weights: Weights,
}

impl<F> LinearEvaluator<F> {
    pub fn new(extractor: F, weights: Weights) -> Self {
        Self { extractor, weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn extractor(&self) -> &F {
        &self.extractor
    }
}

impl<S, F> Evaluator<S> for LinearEvaluator<F>
where
    S: Simulator,
    F: FeatureExtractor<S>,
{
    fn evaluate(&self, sim: &S, snapshot: &S::Snapshot, agent: AgentIndex, mv: S::Move) -> f32 {
        self.extractor
            .features(sim, snapshot, agent, mv)
            .dot(&self.weights)
    }
}
