use std::process::Command;

const CONSISTENT: &str = r#"{
  "title": "ok",
  "items": [ { "id": "a", "name": "A" }, { "id": "b", "name": "B" } ],
  "views": [ {
    "id": "v1", "name": "Main",
    "items": [ { "id": "a", "tile": { "x": 0, "y": 0 } }, { "id": "b", "tile": { "x": 2, "y": 0 } } ],
    "connectors": [ { "id": "c1", "anchors": [
      { "id": "x", "ref": { "item": "a" } },
      { "id": "y", "ref": { "item": "b" } }
    ] } ]
  } ]
}"#;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tileflow_cli"))
}

#[test]
fn prints_version_without_arguments() {
    let output = cli().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("tileflow_core version="));
}

#[test]
fn validate_passes_consistent_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.json");
    std::fs::write(&path, CONSISTENT).unwrap();

    let output = cli().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn validate_reports_orphan_anchor_as_json_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, CONSISTENT.replace(r#"{ "item": "b" }"#, r#"{ "item": "ghost" }"#))
        .unwrap();

    let output = cli().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let issue: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(issue["type"], "INVALID_ANCHOR_TO_VIEW_ITEM_REF");
    assert_eq!(issue["params"]["viewItem"], "ghost");
}

#[test]
fn route_prints_tile_list() {
    let output = cli().args(["route", "0,0", "2,1"]).output().unwrap();
    assert!(output.status.success());

    let tiles: serde_json::Value =
        serde_json::from_slice(&output.stdout).unwrap();
    let tiles = tiles.as_array().unwrap();
    assert_eq!(tiles.len(), 4);
    assert_eq!(tiles[0], serde_json::json!({ "x": 0, "y": 0 }));
    assert_eq!(tiles[3], serde_json::json!({ "x": 2, "y": 1 }));
}

#[test]
fn bad_usage_exits_with_two() {
    let output = cli().args(["route", "nope"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let output = cli().args(["validate", "/definitely/missing.json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
