//! Tests for the configuration module.

use super::*;
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Serializes tests that touch process environment variables.
static ENV_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.search.iterations, 16);
    assert_eq!(config.search.rollout_depth, 5);
    assert_eq!(config.search.discount_levels, 1);
    assert_eq!(config.search.fallback, FallbackKind::FirstLegal);
    assert!(config.search.seed.is_none());
}

#[test]
fn test_search_defaults() {
    let config = CentralConfig::default();
    assert!((config.search.exploration - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    assert!(config.search.discount_factor.abs() < f64::EPSILON);
}

#[test]
fn test_evaluator_defaults() {
    let config = CentralConfig::default();
    let weights = &config.evaluator.weights;
    assert_eq!(weights.len(), 5);
    assert!((weights["numInvaders"] - (-1000.0)).abs() < f64::EPSILON);
    assert!((weights["onDefense"] - 100.0).abs() < f64::EPSILON);
    assert!((weights["invaderDistance"] - (-10.0)).abs() < f64::EPSILON);
    assert!((weights["stop"] - (-100.0)).abs() < f64::EPSILON);
    assert!((weights["reverse"] - (-2.0)).abs() < f64::EPSILON);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[search]
iterations = 200
exploration = 1.0
discount_factor = 0.8
rollout_depth = 3
fallback = "toward_anchor"
seed = 7

[evaluator.weights]
stop = -50.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.search.iterations, 200);
    assert!((config.search.exploration - 1.0).abs() < f64::EPSILON);
    assert!((config.search.discount_factor - 0.8).abs() < f64::EPSILON);
    assert_eq!(config.search.rollout_depth, 3);
    assert_eq!(config.search.fallback, FallbackKind::TowardAnchor);
    assert_eq!(config.search.seed, Some(7));
    assert!((config.evaluator.weights["stop"] - (-50.0)).abs() < f64::EPSILON);
}

#[test]
fn test_partial_weights_merge_over_defaults() {
    let toml_content = r#"
[evaluator.weights]
stop = -50.0
aggression = 3.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    let weights = &config.evaluator.weights;
    assert_eq!(weights.len(), 6);
    assert!((weights["stop"] - (-50.0)).abs() < f64::EPSILON);
    assert!((weights["aggression"] - 3.0).abs() < f64::EPSILON);
    // Untouched features keep their defaults
    assert!((weights["numInvaders"] - (-1000.0)).abs() < f64::EPSILON);
    assert!((weights["onDefense"] - 100.0).abs() < f64::EPSILON);
    assert!((weights["invaderDistance"] - (-10.0)).abs() < f64::EPSILON);
    assert!((weights["reverse"] - (-2.0)).abs() < f64::EPSILON);
}

#[test]
fn test_empty_weights_table_keeps_defaults() {
    let config: CentralConfig = toml::from_str("[evaluator.weights]\n").unwrap();
    assert_eq!(config.evaluator.weights, *weights());
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[search]
iterations = 4
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.search.iterations, 4);
    assert_eq!(config.search.rollout_depth, 5); // Default
    assert_eq!(config.search.discount_levels, 1); // Default
    assert_eq!(config.evaluator.weights.len(), 5); // Default
}

#[test]
fn test_empty_config() {
    let config: CentralConfig = toml::from_str("").unwrap();
    assert_eq!(config.search.iterations, 16);
    assert_eq!(config.search.fallback, FallbackKind::FirstLegal);
}

#[test]
fn test_unknown_fallback_rejected() {
    let toml_content = r#"
[search]
fallback = "random"
"#;
    assert!(toml::from_str::<CentralConfig>(toml_content).is_err());
}

#[test]
fn test_fallback_from_str() {
    assert_eq!("first_legal".parse::<FallbackKind>(), Ok(FallbackKind::FirstLegal));
    assert_eq!("toward_anchor".parse::<FallbackKind>(), Ok(FallbackKind::TowardAnchor));
    assert!("sideways".parse::<FallbackKind>().is_err());
    assert_eq!(FallbackKind::TowardAnchor.to_string(), "toward_anchor");
}

#[test]
fn test_search_env_overrides() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    std::env::set_var("CAPTURE_SEARCH_ITERATIONS", "99");
    std::env::set_var("CAPTURE_SEARCH_DISCOUNT_FACTOR", "0.5");
    std::env::set_var("CAPTURE_SEARCH_FALLBACK", "toward_anchor");
    std::env::set_var("CAPTURE_SEARCH_SEED", "1234");

    let config = load_config();
    assert_eq!(config.search.iterations, 99);
    assert!((config.search.discount_factor - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.search.fallback, FallbackKind::TowardAnchor);
    assert_eq!(config.search.seed, Some(1234));

    std::env::remove_var("CAPTURE_SEARCH_ITERATIONS");
    std::env::remove_var("CAPTURE_SEARCH_DISCOUNT_FACTOR");
    std::env::remove_var("CAPTURE_SEARCH_FALLBACK");
    std::env::remove_var("CAPTURE_SEARCH_SEED");
}

#[test]
fn test_unparseable_env_override_ignored() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    std::env::set_var("CAPTURE_SEARCH_ROLLOUT_DEPTH", "deep");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.search.rollout_depth, 5);

    std::env::remove_var("CAPTURE_SEARCH_ROLLOUT_DEPTH");
}

#[test]
fn test_weight_env_override() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    assert_eq!(weight_env_key("numInvaders"), "CAPTURE_EVALUATOR_WEIGHTS_NUMINVADERS");
    std::env::set_var("CAPTURE_EVALUATOR_WEIGHTS_STOP", "-5");

    let config = apply_env_overrides(CentralConfig::default());
    assert!((config.evaluator.weights["stop"] - (-5.0)).abs() < f64::EPSILON);
    assert!((config.evaluator.weights["reverse"] - (-2.0)).abs() < f64::EPSILON);

    std::env::remove_var("CAPTURE_EVALUATOR_WEIGHTS_STOP");
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();
    let config = load_from_path(std::path::Path::new("/nonexistent/config.toml"));
    assert_eq!(config.search.iterations, 16);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.search.iterations, cloned.search.iterations);
    assert_eq!(config.evaluator.weights, cloned.evaluator.weights);
}
