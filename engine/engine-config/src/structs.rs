//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use serde::{Deserialize, Deserializer};

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_discount_factor() -> f64 {
    defaults::discount_factor()
}
fn d_discount_levels() -> u32 {
    defaults::discount_levels()
}
fn d_rollout_depth() -> u32 {
    defaults::rollout_depth()
}
fn d_fallback() -> FallbackKind {
    defaults::fallback()
}
fn d_weights() -> BTreeMap<String, f64> {
    defaults::weights().clone()
}

/// Lays a weights table from config.toml over the default weights, so a file
/// that sets one feature keeps the rest.
fn merge_weights<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, f64>::deserialize(deserializer)?;
    let mut weights = d_weights();
    weights.extend(overrides);
    Ok(weights)
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

/// Move chosen when the search produces nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// First legal non-no-op move in simulator order.
    FirstLegal,
    /// Legal move whose successor is closest to the agent's anchor point.
    TowardAnchor,
}

impl FromStr for FallbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_legal" => Ok(Self::FirstLegal),
            "toward_anchor" => Ok(Self::TowardAnchor),
            other => Err(format!("unknown fallback policy: {other}")),
        }
    }
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstLegal => write!(f, "first_legal"),
            Self::TowardAnchor => write!(f, "toward_anchor"),
        }
    }
}

/// MCTS search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_discount_factor")]
    pub discount_factor: f64,
    #[serde(default = "d_discount_levels")]
    pub discount_levels: u32,
    #[serde(default = "d_rollout_depth")]
    pub rollout_depth: u32,
    #[serde(default = "d_fallback")]
    pub fallback: FallbackKind,
    /// Seed for tie-breaking. Unset means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration: defaults::exploration(),
            discount_factor: defaults::discount_factor(),
            discount_levels: defaults::discount_levels(),
            rollout_depth: defaults::rollout_depth(),
            fallback: defaults::fallback(),
            seed: None,
        }
    }
}

/// Heuristic evaluator configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Feature name -> weight. Keys set in config.toml override the matching
    /// defaults; unset features keep their default weight.
    #[serde(default = "d_weights", deserialize_with = "merge_weights")]
    pub weights: BTreeMap<String, f64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            weights: defaults::weights().clone(),
        }
    }
}
