//! MCTS configuration parameters.

use engine_config::{FallbackKind, SearchConfig};

/// Configuration for one decision's search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Select/expand/rollout/backup iterations per decision (the budget `B`).
    pub iterations: u32,

    /// UCB1 exploration scalar used while searching.
    /// The final pick always uses 0 (pure exploitation).
    pub exploration: f32,

    /// Weight applied to the rollout reward during backup.
    /// 0 suppresses rollout rewards and keeps only per-node local rewards.
    pub discount_factor: f32,

    /// Power the discount factor is raised to before use.
    pub discount_levels: u32,

    /// Simulated moves per state chain; tree depth plus rollout length never
    /// exceed it.
    pub rollout_depth: u32,

    /// Move chosen when the search yields nothing usable.
    pub fallback: FallbackKind,

    /// Tie-breaking seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for MctsConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            iterations: config.iterations,
            exploration: config.exploration as f32,
            discount_factor: config.discount_factor as f32,
            discount_levels: config.discount_levels,
            rollout_depth: config.rollout_depth,
            fallback: config.fallback,
            seed: config.seed,
        }
    }
}

impl MctsConfig {
    /// Load from config.toml (or built-in defaults) with env overrides applied.
    pub fn load() -> Self {
        Self::from(&engine_config::load_config().search)
    }

    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 32,
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration scalar.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set discount factor and levels.
    pub fn with_discount(mut self, factor: f32, levels: u32) -> Self {
        self.discount_factor = factor;
        self.discount_levels = levels;
        self
    }

    /// Builder pattern: set rollout depth.
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Builder pattern: set fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackKind) -> Self {
        self.fallback = fallback;
        self
    }

    /// Builder pattern: set tie-breaking seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `discount_factor ^ discount_levels`, the multiplier used in backup.
    pub fn effective_discount(&self) -> f32 {
        self.discount_factor.powi(self.discount_levels as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 16);
        assert_eq!(config.rollout_depth, 5);
        assert!((config.exploration - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(config.effective_discount().abs() < 1e-6);
        assert_eq!(config.fallback, FallbackKind::FirstLegal);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_exploration(1.5)
            .with_rollout_depth(3)
            .with_fallback(FallbackKind::TowardAnchor)
            .with_seed(9);

        assert_eq!(config.iterations, 100);
        assert!((config.exploration - 1.5).abs() < 1e-6);
        assert_eq!(config.rollout_depth, 3);
        assert_eq!(config.fallback, FallbackKind::TowardAnchor);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_effective_discount() {
        let config = MctsConfig::default().with_discount(0.5, 1);
        assert!((config.effective_discount() - 0.5).abs() < 1e-6);

        let config = MctsConfig::default().with_discount(0.5, 3);
        assert!((config.effective_discount() - 0.125).abs() < 1e-6);

        // Zero levels means an undiscounted rollout reward
        let config = MctsConfig::default().with_discount(0.0, 0);
        assert!((config.effective_discount() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_search_config() {
        let search = SearchConfig {
            iterations: 7,
            seed: Some(3),
            ..SearchConfig::default()
        };
        let config = MctsConfig::from(&search);
        assert_eq!(config.iterations, 7);
        assert_eq!(config.seed, Some(3));
    }
}
