use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(parts: &[&str]) -> PathBuf {
    let mut path = repo_root().join("fixtures");
    for part in parts {
        path.push(part);
    }
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn summary_lists_levels_and_floors() {
    let dataset = fixture(&["datasets", "campus.json"]);
    let exe = assert_cmd::cargo_bin!("storey-cli");
    let output = Command::new(exe)
        .args(["summary", dataset.to_string_lossy().as_ref()])
        .output()
        .expect("run storey-cli");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["title"], "Main map");
    assert_eq!(json["context"]["level"], "main");
    let levels = json["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0]["nodes"], 3);
    assert_eq!(levels[2]["floors"][1]["name"], "Roof");
}

#[test]
fn replay_writes_the_edited_dataset() {
    let dataset = fixture(&["datasets", "campus.json"]);
    let script = fixture(&["scripts", "wire-roof.json"]);
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("edited.json");

    let exe = assert_cmd::cargo_bin!("storey-cli");
    let output = Command::new(exe)
        .args([
            "replay",
            "--out",
            out.to_string_lossy().as_ref(),
            dataset.to_string_lossy().as_ref(),
            script.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run storey-cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["context"]["building"], "tower");
    assert_eq!(report["context"]["floor"], "ground");
    assert_eq!(report["title"], "Tower - Ground floor");
    assert_eq!(report["steps"], 9);

    let edited: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let roof = &edited["levels"]["tower"]["floors"]["roof"];
    assert_eq!(roof["nodes"]["node2"]["name"], "Dish");
    assert_eq!(roof["edges"]["edge1"]["source"], "node1");
}

#[test]
fn replay_reads_the_dataset_from_stdin() {
    let dataset = fs::read_to_string(fixture(&["datasets", "campus.json"])).unwrap();
    let script = fixture(&["scripts", "prune-main.json"]);

    let exe = assert_cmd::cargo_bin!("storey-cli");
    let assert = assert_cmd::Command::new(exe)
        .args(["replay", "-", script.to_string_lossy().as_ref()])
        .write_stdin(dataset)
        .assert()
        .success();
    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["context"]["level"], "north");
    assert_eq!(report["levelHistory"], serde_json::json!(["main"]));
}

#[test]
fn dangling_edges_fail_the_load() {
    let dataset = fixture(&["datasets", "dangling.json"]);
    let exe = assert_cmd::cargo_bin!("storey-cli");
    let output = Command::new(exe)
        .args([dataset.to_string_lossy().as_ref()])
        .output()
        .expect("run storey-cli");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("node7"), "{stderr}");
}

#[test]
fn failing_script_steps_are_reported() {
    let dataset = fixture(&["datasets", "campus.json"]);
    let tmp = tempfile::tempdir().expect("tempdir");
    let script = tmp.path().join("bad.json");
    fs::write(
        &script,
        r#"[{ "op": "drillDown", "node": "node3" }, { "op": "addNode", "x": 1, "y": 1 }]"#,
    )
    .unwrap();

    let exe = assert_cmd::cargo_bin!("storey-cli");
    let output = Command::new(exe)
        .args([
            "replay",
            dataset.to_string_lossy().as_ref(),
            script.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run storey-cli");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("script step 2 failed"), "{stderr}");
}

#[test]
fn bad_arguments_print_usage() {
    let exe = assert_cmd::cargo_bin!("storey-cli");
    let output = Command::new(exe)
        .args(["replay", "--bogus"])
        .output()
        .expect("run storey-cli");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("USAGE"));
}
