//! Integration tests for Settings loading with an explicit config file.
//!
//! These tests assume no global config at the platform location, so the
//! local file is layered directly over compiled defaults.

use std::fs;

use tempfile::TempDir;

use rsavl::application::ApplicationError;
use rsavl::config::{expand_path, Settings};

#[test]
fn given_local_config_when_load_then_overrides_only_given_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rsavl.toml");
    fs::write(
        &path,
        r#"
[random]
max = 10

[display]
show_balance = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.random.max, 10);
    assert_eq!(settings.random.min, 1);
    assert!(!settings.display.show_balance);
    assert_eq!(settings.animation.visit_delay_ms, 250);
}

#[test]
fn given_missing_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("not found"), "{err}");
}

#[test]
fn given_malformed_toml_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[random\nmax = ").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("broken.toml"), "{err}");
}

#[test]
fn given_inverted_random_range_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rsavl.toml");
    fs::write(&path, "[random]\nmin = 50\nmax = 5\n").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_template_written_to_file_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rsavl.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_plain_path_when_expanding_then_unchanged() {
    let dir = TempDir::new().unwrap();
    assert_eq!(expand_path(dir.path()), dir.path());
}
