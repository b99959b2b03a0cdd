//! Configuration file loading tests

use clap::Parser;
use proctally::app::cli::{Args, RawSettings};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_file_values_fill_gaps_left_by_command_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("proctally.toml");
    fs::write(
        &path,
        "buffer_size = 5\nconsumers = 2\nuid = 33\nrun_for = 3\nlog_format = \"ext\"\n",
    )
    .unwrap();
    let args = Args::try_parse_from([
        "proctally",
        "--config-file",
        path.to_str().unwrap(),
        "--uid",
        "1000",
    ])
    .unwrap();

    let file = RawSettings::load(args.config_file.as_deref()).unwrap();
    let settings = file.overlay(RawSettings::from(&args));
    let config = settings.validate().unwrap();

    assert_eq!(config.capacity.get(), 5);
    assert_eq!(config.consumer_count, 2);
    assert_eq!(config.owner_filter, 1000);
    assert!(config.producer_enabled);
    assert_eq!(settings.run_for(), Some(Duration::from_secs(3)));
    assert_eq!(settings.log_format.as_deref(), Some("ext"));
}

#[test]
fn test_invalid_file_value_is_rejected_at_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "buffer_size = 0\n").unwrap();

    let settings = RawSettings::load(Some(&path)).unwrap();

    assert!(settings.validate().is_err());
}

#[test]
fn test_negative_run_for_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "run_for = -1\n").unwrap();

    let error = RawSettings::load(Some(&path)).unwrap_err();

    assert_eq!(
        error.details(),
        "run_for must be greater than or equal to 0 (got -1)"
    );
}
