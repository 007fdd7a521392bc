//! Integration tests for Settings config loading.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test the explicit config file layered over defaults.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use fallforest::application::ApplicationError;
use fallforest::cli::args::{Cli, Commands};
use fallforest::config::{RawForestConfig, RawSettings, Settings};

#[test]
fn given_config_file_with_forest_section_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forest.toml");
    fs::write(
        &path,
        r#"
[forest]
root_leaves = 7
wind_strength = 4
seed = 11

[pacing]
interval_ms = 0
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.forest.root_leaves, 7);
    assert_eq!(settings.forest.wind_strength, 4);
    assert_eq!(settings.forest.seed, Some(11));
    assert_eq!(settings.pacing.interval_ms, 0);
    // untouched fields keep their defaults
    assert_eq!(settings.forest.root_branches, 2);
    assert_eq!(settings.forest.spring_capacity, 3);
}

#[test]
fn given_negative_count_in_file_when_load_then_loads_but_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forest.toml");
    fs::write(&path, "[forest]\nroot_branches = -3\nspring_capacity = 0\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("negative values still parse");

    assert!(settings.forest.root_params().is_err());
    assert!(settings.forest.capacity().is_err());
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn given_malformed_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[forest\nroot_leaves = ").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_log_section_when_load_then_uses_file_and_append() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forest.toml");
    fs::write(&path, "[log]\nfile = \"/tmp/leaves.log\"\nappend = true\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();

    assert_eq!(settings.log.file, Some(PathBuf::from("/tmp/leaves.log")));
    assert!(settings.log.append);
}

#[test]
fn given_cli_overlay_when_merging_over_file_then_flags_win() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forest.toml");
    fs::write(&path, "[forest]\nroot_leaves = 7\nwind_strength = 4\n").unwrap();
    let flags = RawSettings {
        forest: RawForestConfig {
            wind_strength: Some(1),
            ..Default::default()
        },
        ..Default::default()
    };

    let settings = Settings::load(Some(path.as_path())).unwrap().merge_with(&flags);

    assert_eq!(settings.forest.root_leaves, 7);
    assert_eq!(settings.forest.wind_strength, 1);
}

#[test]
fn given_tilde_in_log_file_flag_when_merging_then_path_is_expanded() {
    // `--log-file=~/...` reaches us unexpanded, the shell only expands a leading tilde
    let cli = Cli::try_parse_from(["fallforest", "run", "--log-file=~/leaves.txt"]).unwrap();
    let Some(Commands::Run(args)) = cli.command else {
        panic!("expected run command");
    };

    let settings = Settings::default().merge_with(&args.overrides());

    let expected = PathBuf::from(shellexpand::tilde("~/leaves.txt").into_owned());
    assert_eq!(settings.log.file, Some(expected));
    assert!(!settings.log.file.unwrap().starts_with("~"));
}
