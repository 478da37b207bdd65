//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by CAPTURE_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("CAPTURE_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from CAPTURE_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "CAPTURE_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // Parseable field (u32, f64, enums with FromStr, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Environment variable overriding one evaluator weight.
///
/// `numInvaders` maps to `CAPTURE_EVALUATOR_WEIGHTS_NUMINVADERS`.
pub fn weight_env_key(feature: &str) -> String {
    format!("CAPTURE_EVALUATOR_WEIGHTS_{}", feature.to_ascii_uppercase())
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CAPTURE_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Search
    env_override!(
        config,
        search.iterations,
        "CAPTURE_SEARCH_ITERATIONS",
        parse
    );
    env_override!(
        config,
        search.exploration,
        "CAPTURE_SEARCH_EXPLORATION",
        parse
    );
    env_override!(
        config,
        search.discount_factor,
        "CAPTURE_SEARCH_DISCOUNT_FACTOR",
        parse
    );
    env_override!(
        config,
        search.discount_levels,
        "CAPTURE_SEARCH_DISCOUNT_LEVELS",
        parse
    );
    env_override!(
        config,
        search.rollout_depth,
        "CAPTURE_SEARCH_ROLLOUT_DEPTH",
        parse
    );
    env_override!(config, search.fallback, "CAPTURE_SEARCH_FALLBACK", parse);
    env_override!(config, search.seed, "CAPTURE_SEARCH_SEED", optional_parse);

    // Evaluator: only features already present can be overridden
    for (feature, weight) in config.evaluator.weights.iter_mut() {
        if let Some(v) = std::env::var(weight_env_key(feature))
            .ok()
            .and_then(|s| s.parse().ok())
        {
            *weight = v;
        }
    }

    config
}
