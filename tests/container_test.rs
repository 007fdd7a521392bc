//! Tests for ForestContainer wiring and the log file sink

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use fallforest::config::Settings;
use fallforest::infrastructure::di::ForestContainer;
use fallforest::infrastructure::traits::{EventSink, LogFileSink, NoPacer, StdRandom};
use fallforest::infrastructure::InfraError;

fn quiet_settings(dir: &TempDir, append: bool) -> Settings {
    let mut settings = Settings::default();
    settings.forest.seed = Some(42);
    settings.pacing.interval_ms = 0;
    settings.log.file = Some(dir.path().join("leaf_fall_log.txt"));
    settings.log.append = append;
    settings
}

fn run_once(settings: Settings) -> usize {
    let mut container = ForestContainer::new(settings);
    let capacity = container.settings.forest.capacity().unwrap();
    let mut tree = container.build_tree().unwrap();
    let mut sink = container.open_sink().unwrap();
    let report = container
        .simulator()
        .run_cycle(&mut tree, capacity, &mut sink)
        .unwrap();
    report.fall.len() + report.grow.len() + 5
}

#[test]
fn given_log_file_when_running_cycle_then_log_holds_every_line() {
    let dir = TempDir::new().unwrap();
    let settings = quiet_settings(&dir, false);
    let log_path = settings.log.file.clone().unwrap();

    let written = run_once(settings);

    let log = fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), written);
    assert!(log.starts_with(" The forest prepares for autumn..."));
}

#[test]
fn given_truncate_mode_when_running_twice_then_log_holds_one_run() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("leaf_fall_log.txt");

    let first = run_once(quiet_settings(&dir, false));
    let second = run_once(quiet_settings(&dir, false));

    assert_eq!(first, second, "same seed, same run");
    let log = fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), second);
}

#[test]
fn given_append_mode_when_running_twice_then_log_holds_both_runs() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("leaf_fall_log.txt");

    let first = run_once(quiet_settings(&dir, true));
    let second = run_once(quiet_settings(&dir, true));

    let log = fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), first + second);
}

#[test]
fn given_unwritable_log_path_when_opening_sink_then_io_error() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.log.file = Some(dir.path().join("missing").join("log.txt"));

    let container = ForestContainer::new(settings);
    let result = container.open_sink();

    assert!(matches!(result, Err(InfraError::Io { .. })));
}

#[test]
fn given_injected_deps_when_building_then_uses_supplied_random_source() {
    let mut settings = Settings::default();
    settings.forest.root_branches = 4;

    let mut a = ForestContainer::with_deps(
        settings.clone(),
        Arc::new(NoPacer),
        Box::new(StdRandom::seeded(3)),
    );
    let mut b = ForestContainer::with_deps(settings, Arc::new(NoPacer), Box::new(StdRandom::seeded(3)));

    assert_eq!(a.build_tree().unwrap(), b.build_tree().unwrap());
}

#[test]
fn given_negative_config_when_building_then_domain_error() {
    let mut settings = Settings::default();
    settings.forest.root_leaves = -1;

    let mut container = ForestContainer::new(settings);

    assert!(container.build_tree().is_err());
}

#[test]
fn given_log_file_sink_when_writing_then_lines_land_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("direct.log");

    let mut sink = LogFileSink::open(&path, false).unwrap();
    sink.write_line("first").unwrap();
    sink.write_line("second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    assert_eq!(sink.path(), path.as_path());
}
