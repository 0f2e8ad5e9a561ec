#![allow(missing_docs)]

use std::{
    path::Path,
    process::{Command, Output, Stdio},
};

const CLIQUENET: &str = env!("CARGO_BIN_EXE_cliquenet");

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Runs `cliquenet <args>` without stdin.
///
/// Tracing is suppressed via `RUST_LOG=off` so that log lines don't pollute stdout-based
/// assertions.
fn cliquenet(args: &[&str]) -> Output {
    Command::new(CLIQUENET)
        .env("RUST_LOG", "off")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

/// Runs `cliquenet <args>` and returns stdout, asserting exit code 0.
#[track_caller]
fn cliquenet_ok(args: &[&str]) -> String {
    let output = cliquenet(args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "args {args:?} failed.\nstdout: {stdout}\nstderr: {stderr}");
    stdout.into_owned()
}

/// Runs `cliquenet <args>` and returns stderr, asserting failure.
#[track_caller]
fn cliquenet_err(args: &[&str]) -> String {
    let output = cliquenet(args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "args {args:?} succeeded.\nstdout: {stdout}");
    stderr.into_owned()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── CLI tests ───────────────────────────────────────────────────────────────

#[test]
fn help() {
    let stdout = cliquenet_ok(&["--help"]);
    assert!(stdout.contains("Usage"), "stdout: {stdout}");
    for command in ["new", "delete", "stop", "restart"] {
        assert!(stdout.contains(command), "stdout: {stdout}");
    }
    assert!(stdout.contains("--datadir"), "stdout: {stdout}");
}

#[test]
fn new_help_lists_parameters() {
    let stdout = cliquenet_ok(&["n", "--help"]);
    for flag in ["--authorities", "--peers", "--password", "--block-time"] {
        assert!(stdout.contains(flag), "stdout: {stdout}");
    }
}

#[test]
fn delete_absent_network() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");

    let stdout = cliquenet_ok(&["delete", "--datadir", path_str(&datadir)]);
    assert!(stdout.contains("Network deleted successfully."), "stdout: {stdout}");
    assert!(!datadir.exists());

    // again, via alias
    cliquenet_ok(&["d", "--datadir", path_str(&datadir)]);
}

#[test]
fn delete_removes_working_area() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");
    std::fs::create_dir_all(datadir.join("node1")).unwrap();
    std::fs::write(datadir.join("network-config.json"), r#"{"authorities":1,"peers":0}"#).unwrap();

    cliquenet_ok(&["delete", "--datadir", path_str(&datadir)]);
    assert!(!datadir.exists());
}

#[test]
fn stop_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");

    let stdout = cliquenet_ok(&["s", "--datadir", path_str(&datadir)]);
    assert!(stdout.contains("Network stopped successfully."), "stdout: {stdout}");
    assert!(!datadir.exists());
}

#[test]
fn restart_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");

    let stderr = cliquenet_err(&["restart", "--datadir", path_str(&datadir)]);
    assert!(stderr.contains("network-config.json"), "stderr: {stderr}");
}

#[test]
fn new_rejects_invalid_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");

    let stderr = cliquenet_err(&[
        "new",
        "--datadir",
        path_str(&datadir),
        "--authorities",
        "1",
        "--peers",
        "0",
        "--password",
        "pw",
        "--block-time",
        "0",
    ]);
    assert!(stderr.contains("block time should be more than 0"), "stderr: {stderr}");
    assert!(!datadir.exists());
}

#[test]
fn new_fails_without_geth() {
    let dir = tempfile::tempdir().unwrap();
    let datadir = dir.path().join("output");
    let config = dir.path().join("cliquenet.toml");
    std::fs::write(&config, "[binaries]\ngeth = \"cliquenet-missing-geth\"\n").unwrap();

    let stderr = cliquenet_err(&[
        "new",
        "--datadir",
        path_str(&datadir),
        "--config",
        path_str(&config),
        "--authorities",
        "1",
        "--peers",
        "1",
        "--password",
        "pw",
        "--block-time",
        "5",
    ]);
    assert!(stderr.contains("cliquenet-missing-geth"), "stderr: {stderr}");

    // provisioning stopped at the first account, nothing was cleaned up
    assert!(datadir.join("node1").is_dir());
    assert!(datadir.join("node2").is_dir());
    assert_eq!(std::fs::read_to_string(datadir.join("password.txt")).unwrap(), "pw");
    assert!(!datadir.join("genesis.json").exists());
    assert!(!datadir.join("network-config.json").exists());
}
