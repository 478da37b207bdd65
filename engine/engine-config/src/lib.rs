//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the search and game crates.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`CAPTURE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! CAPTURE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     CAPTURE_SEARCH_ITERATIONS=64
//!     CAPTURE_SEARCH_DISCOUNT_FACTOR=0.8
//!     CAPTURE_SEARCH_FALLBACK=toward_anchor
//!     CAPTURE_SEARCH_SEED=42
//!     CAPTURE_EVALUATOR_WEIGHTS_STOP=-50
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, weight_env_key, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
