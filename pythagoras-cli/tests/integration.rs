//! Integration tests for the pythagoras CLI.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pythagoras"))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn generate_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.png");

    let output = run(&[
        "generate", "-d", "5", "-a", "40", "--width", "200", "--height", "150", "-b", "20",
        "-o", out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "Should write a PNG file");
}

#[test]
fn generate_svg_with_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.svg");

    let output = run(&[
        "generate", "-d", "3", "--width", "100", "--height", "100", "-b", "10", "--grid", "--json",
        "-o", out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"), "Should have SVG element");
    assert!(svg.contains("<line"), "Grid should add line elements");
    assert_eq!(svg.matches("<polygon").count(), 7 + 7 + 8);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should print valid JSON");
    assert_eq!(json["squares"], 15);
    assert_eq!(json["triangles"], 7);
    assert_eq!(json["levels_completed"], 3);
    assert_eq!(json["cancelled"], false);
}

#[test]
fn generate_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tree.yaml");
    let out = dir.path().join("tree.svg");
    fs::write(
        &config,
        "width: 120\nheight: 80\nbase_length: 8\ndepth: 2\nangle: 30\nleaf_squares: false\n",
    )
    .unwrap();

    let output = run(&["generate", "-c", config.to_str().unwrap(), "--json", "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["width"], 120);
    assert_eq!(json["squares"], 3);
    assert_eq!(json["triangles"], 3);
}

#[test]
fn invalid_angle_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.png");

    let output = run(&["generate", "-a", "90", "-o", out.to_str().unwrap()]);
    assert!(!output.status.success(), "90 degrees must be rejected");
    assert!(String::from_utf8_lossy(&output.stderr).contains("angle"));
    assert!(!out.exists(), "No file should be written");
}

#[test]
fn strict_rejects_non_unit_edge() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.png");

    let output = run(&["generate", "--strict", "--left=-1;0", "--right=1;0", "-o", out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn depth_ceiling_is_enforced() {
    let output = run(&["config", "--check", "-d", "40"]);
    assert!(!output.status.success(), "depth 40 is above the default ceiling");
}

#[test]
fn estimate_reference_value() {
    let output = run(&["estimate", "-b", "100", "-a", "45", "-m", "1"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "optimal depth: 14");

    let output = run(&["estimate", "-a", "45", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["depth"], 14);
}

#[test]
fn config_dump_round_trips() {
    let output = run(&["config", "-d", "7", "--mirror", "--background", "#102030"]);
    assert!(output.status.success());

    let yaml = String::from_utf8_lossy(&output.stdout);
    assert!(yaml.contains("depth: 7"), "got {}", yaml);
    assert!(yaml.contains("mirror: true"));
    assert!(yaml.contains("#102030"));

    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("saved.yaml");
    fs::write(&saved, yaml.as_bytes()).unwrap();
    let again = run(&["config", "-c", saved.to_str().unwrap()]);
    assert_eq!(String::from_utf8_lossy(&again.stdout), yaml);
}

#[test]
fn unusable_time_limits_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.svg");

    for limit in ["inf", "NaN", "1e300"] {
        let output = run(&["generate", "-d", "2", "--time-limit", limit, "-o", out.to_str().unwrap()]);
        assert!(!output.status.success(), "--time-limit {} must be rejected", limit);
        assert_eq!(output.status.code(), Some(2), "--time-limit {} should be a usage error, not a panic", limit);
        assert!(String::from_utf8_lossy(&output.stderr).contains("time limit"));
        assert!(!out.exists());
    }
}

#[test]
fn time_limit_writes_partial_tree() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tree.png");

    let output = run(&["generate", "-d", "16", "--time-limit", "0", "--json", "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.exists(), "A cancelled run still writes its image");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["cancelled"], true);
    assert_eq!(json["depth"], 16);
    assert!(json["levels_completed"].as_u64().unwrap() < 16);
}
