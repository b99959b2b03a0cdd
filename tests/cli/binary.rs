//! Run the built binary end to end

use std::process::Command;
use tempfile::TempDir;

fn proctally() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_proctally"));
    command.args(["--no-color", "--log-format", "text"]);
    command
}

#[test]
fn test_invalid_parameters_exit_with_failure() {
    let output = proctally().args(["--consumers", "-1"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("consumers must be greater than or equal to 0"));
}

#[test]
fn test_missing_config_file_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = proctally()
        .args(["--config-file", missing.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_run_for_stops_cleanly_without_producer() {
    let output = proctally()
        .args(["--producers", "0", "--consumers", "3", "--uid", "77", "--run-for", "1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Creating consumer threads"));
    assert!(stderr.contains("The total elapsed time of all processes for UID 77 is 00:00:00"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_scans_own_processes_and_reports_summary() {
    let uid = unsafe { libc::getuid() };

    let output = proctally()
        .args([
            "--buffer-size",
            "4",
            "--consumers",
            "2",
            "--uid",
            &uid.to_string(),
            "--run-for",
            "1",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[Producer-1] Produced Item#-1 at buffer index:0"));
    assert!(stderr.contains(&format!("The total elapsed time of all processes for UID {}", uid)));
}
