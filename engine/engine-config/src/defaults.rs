//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time so
//! every crate agrees on the same values.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::structs::FallbackKind;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    search: SearchDefaults,
    evaluator: EvaluatorDefaults,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    iterations: u32,
    exploration: f64,
    discount_factor: f64,
    discount_levels: u32,
    rollout_depth: u32,
    fallback: FallbackKind,
}

#[derive(Debug, Deserialize)]
struct EvaluatorDefaults {
    weights: BTreeMap<String, f64>,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Search
pub fn iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}
pub fn discount_factor() -> f64 {
    DEFAULTS.search.discount_factor
}
pub fn discount_levels() -> u32 {
    DEFAULTS.search.discount_levels
}
pub fn rollout_depth() -> u32 {
    DEFAULTS.search.rollout_depth
}
pub fn fallback() -> FallbackKind {
    DEFAULTS.search.fallback
}

// Evaluator
pub fn weights() -> &'static BTreeMap<String, f64> {
    &DEFAULTS.evaluator.weights
}
