mod common;

use std::fs::File;
use std::io::{self, BufReader};
use std::process::{Command, Stdio};

use assert_cmd::cargo::CommandCargoExt;
use pretty_assertions::assert_eq;

#[test]
fn convert_cli() {
    let input_file = "./tests/data/tasks/single.json";
    let expected = common::expected("./tests/data/tasks/results/single.json");

    // Test with file passed in
    let output = Command::cargo_bin("taskprof-convert")
        .unwrap()
        .arg(input_file)
        .output()
        .expect("failed to execute process");
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result, expected);

    // Test with STDIN
    let mut child = Command::cargo_bin("taskprof-convert")
        .unwrap()
        .arg("--pretty")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn child process");
    let mut input = BufReader::new(File::open(input_file).unwrap());
    let stdin = child.stdin.as_mut().expect("Failed to open stdin");
    io::copy(&mut input, stdin).unwrap();
    let output = child.wait_with_output().expect("Failed to read stdout");
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result, expected);
}

#[test]
fn convert_cli_timezone() {
    let output = Command::cargo_bin("taskprof-convert")
        .unwrap()
        .args(["--timezone", "UTC", "./tests/data/tasks/single.json"])
        .output()
        .expect("failed to execute process");
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        result["threads"][0]["markers"]["data"][0]["startTime"],
        "00:00:00"
    );
}

#[test]
fn convert_cli_reports_errors() {
    let output = Command::cargo_bin("taskprof-convert")
        .unwrap()
        .arg("./tests/data/tasks/empty.json")
        .output()
        .expect("failed to execute process");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("[ERROR "), "unexpected stderr: {}", stderr);
    assert!(
        stderr.ends_with("profile: no tasks found\n"),
        "unexpected stderr: {}",
        stderr
    );

    // quiet still fails, just without saying so
    let output = Command::cargo_bin("taskprof-convert")
        .unwrap()
        .args(["-q", "./tests/data/tasks/empty.json"])
        .output()
        .expect("failed to execute process");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty());
}
