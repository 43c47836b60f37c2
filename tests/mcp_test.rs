use std::fs;

use putgraph::mcp::{
    detect_operation, get_tool_definitions, handle_tool_call, tool_for_operation, Operation,
    RunStore,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("load.R"),
        "#put id:\"load\", node_type:\"input\", output:\"data.csv\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("process.R"),
        "#put id:\"process\", input:\"data.csv\"\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_tool_definitions_carry_schemas() {
    let tools = get_tool_definitions();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    for expected in [
        "putgraph_scan",
        "putgraph_auto",
        "putgraph_merge",
        "putgraph_diagram",
        "putgraph_languages",
        "putgraph_get_run",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
    for tool in &tools {
        assert_eq!(tool.input_schema["type"], "object");
        assert!(!tool.description.is_empty());
    }
}

#[test]
fn test_scan_tool_returns_summary_and_run_id() {
    let dir = fixture();
    let store = RunStore::new();
    let args = json!({ "path": dir.path().to_string_lossy() });

    let text = handle_tool_call("putgraph_scan", &args, &store).unwrap();
    assert!(text.contains("2 node(s)"));
    assert!(text.contains("run_id: "));
    assert!(text.contains("\"id\": \"load\""));
}

#[test]
fn test_get_run_round_trip() {
    let dir = fixture();
    let store = RunStore::new();
    let args = json!({ "path": dir.path().to_string_lossy() });

    let text = handle_tool_call("putgraph_scan", &args, &store).unwrap();
    let run_id = text
        .lines()
        .find_map(|l| l.strip_prefix("run_id: "))
        .unwrap()
        .to_string();

    let stored = handle_tool_call("putgraph_get_run", &json!({ "run_id": run_id }), &store).unwrap();
    let workflow: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(workflow["nodes"].as_array().unwrap().len(), 2);

    let missing =
        handle_tool_call("putgraph_get_run", &json!({ "run_id": "nope" }), &store).unwrap();
    assert!(missing.contains("no stored run"));
}

#[test]
fn test_diagram_tool_returns_fenced_mermaid() {
    let dir = fixture();
    let store = RunStore::new();
    let args = json!({
        "path": dir.path().to_string_lossy(),
        "direction": "LR",
        "theme": "dark"
    });

    let text = handle_tool_call("putgraph_diagram", &args, &store).unwrap();
    assert!(text.starts_with("```mermaid\n"));
    assert!(text.contains("flowchart LR"));
    assert!(text.trim_end().ends_with("```"));
}

#[test]
fn test_traversal_paths_downgrade_to_cwd() {
    let store = RunStore::new();
    let args = json!({ "path": "../../etc" });
    // The call still runs, just against the current directory.
    let text = handle_tool_call("putgraph_scan", &args, &store).unwrap();
    assert!(text.contains("run_id: "));
}

#[test]
fn test_languages_tool() {
    let store = RunStore::new();
    let all = handle_tool_call("putgraph_languages", &json!({}), &store).unwrap();
    assert!(all.lines().any(|l| l == "rust"));

    let detection =
        handle_tool_call("putgraph_languages", &json!({ "detection_only": true }), &store).unwrap();
    assert!(detection.lines().count() <= all.lines().count());
}

#[test]
fn test_unknown_tool_is_an_error() {
    let store = RunStore::new();
    assert!(handle_tool_call("putgraph_rm_rf", &json!({}), &store).is_err());
}

#[test]
fn test_free_text_request_dispatches_end_to_end() {
    let dir = fixture();
    let store = RunStore::new();
    let request = format!("please scan \"{}\" for annotations", dir.path().display());

    let text = handle_tool_call("putgraph_request", &json!({ "request": request }), &store).unwrap();
    assert!(text.contains("2 node(s)"));

    let help = handle_tool_call(
        "putgraph_request",
        &json!({ "request": "help" }),
        &store,
    )
    .unwrap();
    assert!(help.contains("putgraph_scan"));

    let skills = handle_tool_call(
        "putgraph_request",
        &json!({ "request": "show me the annotation skills" }),
        &store,
    )
    .unwrap();
    assert!(skills.contains("#put id:"));
}

#[test]
fn test_free_text_operations_map_to_tools() {
    assert_eq!(
        tool_for_operation(detect_operation("scan './src' for annotations")),
        Some("putgraph_scan")
    );
    assert_eq!(
        tool_for_operation(detect_operation("draw me a mermaid chart")),
        Some("putgraph_diagram")
    );
    assert_eq!(
        tool_for_operation(detect_operation("merge manual and detected")),
        Some("putgraph_merge")
    );
    assert_eq!(tool_for_operation(Operation::Help), None);
}
