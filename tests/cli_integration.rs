//! CLI integration tests
//!
//! Tests the CLI surface of both binaries without touching the network.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_server_version_flag() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-server");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_server_help_flag() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-server");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_server_rejects_bad_port() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-server");
    cmd.args(["--port", "not-a-port"]);

    cmd.assert().failure();
}

#[test]
fn test_login_version_flag() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-login");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_login_help_flag() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-login");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--qr-output"))
        .stdout(predicate::str::contains("--no-browser"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_login_rejects_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("zhipin-session-login");
    cmd.arg("--definitely-not-a-flag");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
