//! CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn sherpa() -> Command {
    Command::cargo_bin("sherpa").unwrap()
}

#[test]
fn list_shows_catalog_tools() {
    sherpa()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ripgrep"))
        .stdout(predicate::str::contains("jq"));
}

#[test]
fn list_json_is_parseable() {
    let output = sherpa().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.as_array().unwrap().len() >= 10);
}

#[test]
fn plan_ready_on_ubuntu_preset() {
    sherpa()
        .args(["plan", "ripgrep", "--preset", "ubuntu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apt"))
        .stdout(predicate::str::contains("sudo apt-get install -y ripgrep"));
}

#[test]
fn plan_ready_on_alpine_preset() {
    sherpa()
        .args(["plan", "ripgrep", "--preset", "alpine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apk add ripgrep"));
}

#[test]
fn plan_json_carries_statuses() {
    let output = sherpa()
        .args(["plan", "jq", "--preset", "fedora", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tool"], "jq");
    assert_eq!(value["statuses"]["dnf"]["status"], "ready");
    assert_eq!(value["statuses"]["apt"]["status"], "impossible");
}

#[test]
fn plan_unknown_tool_fails() {
    sherpa()
        .args(["plan", "definitely-not-a-tool", "--preset", "ubuntu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool"));
}

#[test]
fn plan_unknown_preset_fails_with_hint() {
    sherpa()
        .args(["plan", "jq", "--preset", "beos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset"));
}

#[test]
fn diagnose_matches_apt_failure_from_stdin() {
    let mut cmd = sherpa();
    cmd.args(["diagnose", "jq", "--method", "apt", "--preset", "ubuntu"]);
    cmd.write_stdin("E: Unable to locate package jq\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("apt-get update"));
}

#[test]
fn diagnose_reads_input_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "error: linker `cc` not found").unwrap();

    sherpa()
        .args([
            "diagnose",
            "ripgrep",
            "--method",
            "cargo",
            "--preset",
            "arch",
            "--input",
        ])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("install build-tools"));
}

#[test]
fn diagnose_unmatched_reports_raw_output() {
    let mut cmd = sherpa();
    cmd.args(["diagnose", "jq", "--method", "apt", "--preset", "ubuntu"]);
    cmd.write_stdin("complete gibberish nobody recognizes\n");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("complete gibberish"));
}

#[test]
fn diagnose_json_plan_shape() {
    let mut cmd = sherpa();
    cmd.args([
        "diagnose", "jq", "--method", "apt", "--preset", "ubuntu", "--json",
    ]);
    cmd.write_stdin("E: Unable to locate package jq\n");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["handler"], "apt_package_not_found");
    assert!(value["options"].as_array().unwrap().len() >= 1);
}

#[test]
fn doctor_json_reports_profile() {
    let output = sherpa().args(["doctor", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("installed_binaries").is_some());
    assert!(value.get("fs_writable").is_some());
}

#[test]
fn completions_generate_for_bash() {
    sherpa()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sherpa"));
}

#[test]
fn help_lists_subcommands() {
    sherpa()
        .args(["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("diagnose"))
        .stdout(predicate::str::contains("plan"));
}
