//! Tests for layered configuration loading.

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use crate::config::{ConfigError, GraphweaveConfig, RelaxerConfig};

fn write_toml(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_defaults() {
    let config = GraphweaveConfig::default();
    assert_eq!(config.relaxer.sleep_ms, 100);
    assert_eq!(config.relaxer.prerelax_budget_ms, 500);
    assert_eq!(config.relaxer.stop_grace_ms, 1000);
    assert!((config.pagerank.alpha - 0.15).abs() < f64::EPSILON);
    assert_eq!(config.pagerank.max_iterations, 100);
    assert!(config.validate().is_ok());
}

#[test]
fn test_relaxer_durations() {
    let relaxer = RelaxerConfig {
        sleep_ms: 5,
        prerelax_budget_ms: 0,
        stop_grace_ms: 250,
    };
    assert_eq!(relaxer.sleep_time().as_millis(), 5);
    assert!(relaxer.prerelax_budget().is_zero());
    assert_eq!(relaxer.stop_grace().as_millis(), 250);
}

#[test]
fn test_from_toml_str_overrides_only_given_keys() {
    let config = GraphweaveConfig::from_toml_str(
        r"
        [relaxer]
        sleep_ms = 20

        [pagerank]
        alpha = 0.5
        ",
    )
    .unwrap();
    assert_eq!(config.relaxer.sleep_ms, 20);
    assert_eq!(config.relaxer.prerelax_budget_ms, 500);
    assert!((config.pagerank.alpha - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.pagerank.max_iterations, 100);
}

#[test]
fn test_invalid_alpha_rejected() {
    let err = GraphweaveConfig::from_toml_str("[pagerank]\nalpha = 2.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("alpha"));
}

#[test]
fn test_zero_stop_grace_rejected() {
    let err = GraphweaveConfig::from_toml_str("[relaxer]\nstop_grace_ms = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_value_is_load_error() {
    let err = GraphweaveConfig::from_toml_str("[relaxer]\nsleep_ms = \"fast\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_toml("[relaxer]\nprerelax_budget_ms = 50\n");
    let config = GraphweaveConfig::load(file.path()).unwrap();
    assert_eq!(config.relaxer.prerelax_budget_ms, 50);
    assert_eq!(config.relaxer.sleep_ms, 100);
}

#[test]
#[serial]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = GraphweaveConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_toml("[relaxer]\nsleep_ms = 40\n");
    std::env::set_var("GRAPHWEAVE_RELAXER__SLEEP_MS", "7");

    let loaded = GraphweaveConfig::load(file.path());
    let from_env = GraphweaveConfig::from_env();
    std::env::remove_var("GRAPHWEAVE_RELAXER__SLEEP_MS");

    assert_eq!(loaded.unwrap().relaxer.sleep_ms, 7);
    assert_eq!(from_env.unwrap().relaxer.sleep_ms, 7);
}
