//! CLI argument parsing tests

use clap::Parser;
use proctally::app::cli::{Args, RawSettings};

#[test]
fn test_long_and_short_flags_agree() {
    let long = Args::try_parse_from([
        "proctally",
        "--buffer-size",
        "8",
        "--producers",
        "1",
        "--consumers",
        "4",
        "--uid",
        "1000",
    ])
    .unwrap();
    let short =
        Args::try_parse_from(["proctally", "-b", "8", "-p", "1", "-n", "4", "-u", "1000"]).unwrap();

    assert_eq!(RawSettings::from(&long), RawSettings::from(&short));
}

#[test]
fn test_invalid_values_become_configuration_errors() {
    let cases = [
        (vec!["--buffer-size", "0"], "buffer_size must be greater than 0 (got 0)"),
        (vec!["--producers", "2"], "producers must be 0 or 1 (got 2)"),
        (
            vec!["--consumers", "-3"],
            "consumers must be greater than or equal to 0 (got -3)",
        ),
    ];

    for (flags, message) in cases {
        let args = Args::try_parse_from(std::iter::once("proctally").chain(flags)).unwrap();
        let error = RawSettings::from(&args).validate().unwrap_err();
        assert_eq!(error.details(), message);
    }
}

#[test]
fn test_non_numeric_uid_is_a_usage_error() {
    assert!(Args::try_parse_from(["proctally", "--uid", "root"]).is_err());
}

#[test]
fn test_version_includes_build_metadata() {
    let error = Args::try_parse_from(["proctally", "--version"]).unwrap_err();

    assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    assert!(error.to_string().contains("git "));
}
