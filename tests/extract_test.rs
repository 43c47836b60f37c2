use std::fs;

use putgraph::extract;
use putgraph::options::ScanOptions;
use putgraph::workflow::WorkflowSource;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_basic_pipeline_scenario() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "load.R",
        "#put id:\"load\", label:\"Load\", node_type:\"input\", output:\"data.csv\"\nd <- 1\n",
    );
    write_file(
        &dir,
        "process.R",
        "#put id:\"process\", label:\"Process\", node_type:\"process\", input:\"data.csv\", output:\"result.csv\"\n",
    );

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(workflow.node_count(), 2);
    assert_eq!(workflow.source, WorkflowSource::Annotations);
    assert_eq!(workflow.file_count(), 2);

    let load = workflow.nodes.iter().find(|n| n.id == "load").unwrap();
    assert_eq!(load.node_type.as_deref(), Some("input"));
    assert_eq!(load.output.as_deref(), Some("data.csv"));
    assert_eq!(load.file_type.as_deref(), Some("r"));
}

#[test]
fn test_output_defaults_to_file_name() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "foo.R", "#put id:\"step\", label:\"Step\"\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(workflow.nodes[0].output.as_deref(), Some("foo.R"));
}

#[test]
fn test_missing_id_gets_generated() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put label:\"No id here\"\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(workflow.node_count(), 1);
    assert!(!workflow.nodes[0].id.is_empty());
}

#[test]
fn test_idempotence_with_explicit_ids() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put id:\"a\", output:\"a.csv\"\n");
    write_file(&dir, "b.R", "#put id:\"b\", input:\"a.csv\"\n");

    let options = ScanOptions::default();
    let first = extract(dir.path(), &options).unwrap();
    let second = extract(dir.path(), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_directory_returns_empty_table_with_warning() {
    let dir = TempDir::new().unwrap();
    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert!(workflow.is_empty());
    assert_eq!(workflow.warnings.len(), 1);
    assert!(workflow.warnings[0].contains("no files matched"));

    // The full fixed column set is still present.
    let columns = workflow.columns();
    for col in ["file_name", "file_path", "file_type", "id", "label", "node_type", "input", "output"] {
        assert!(columns.contains(&col.to_string()));
    }
}

#[test]
fn test_files_without_annotations_yield_empty_table_silently() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "plain.R", "x <- 1\ny <- 2\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert!(workflow.is_empty());
    assert!(workflow.warnings.is_empty());
}

#[test]
fn test_duplicate_ids_reported_once_all_rows_kept() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put id:\"same\"\n");
    write_file(&dir, "b.R", "#put id:\"same\"\n#put id:\"other\"\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(workflow.node_count(), 3);
    let dup_warnings: Vec<_> = workflow
        .warnings
        .iter()
        .filter(|w| w.contains("duplicate"))
        .collect();
    assert_eq!(dup_warnings.len(), 1);
    assert!(dup_warnings[0].contains("same"));
}

#[test]
fn test_validation_issues_surface_as_warnings() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put id:\"a\", node_type:\"widget\", input:\"rawdata\"\n");

    let validated = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(validated.node_count(), 1);
    assert!(validated.warnings.iter().any(|w| w.contains("unusual node_type")));

    let unvalidated = extract(
        dir.path(),
        &ScanOptions {
            validate: false,
            ..ScanOptions::default()
        },
    )
    .unwrap();
    assert!(unvalidated.warnings.is_empty());
}

#[test]
fn test_unrecognized_node_type_passes_through() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put id:\"a\", node_type:\"widget\"\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(workflow.nodes[0].node_type.as_deref(), Some("widget"));
}

#[test]
fn test_line_numbers_when_requested() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "x <- 1\n\n#put id:\"late\"\n");

    let options = ScanOptions {
        include_line_numbers: true,
        ..ScanOptions::default()
    };
    let workflow = extract(dir.path(), &options).unwrap();
    assert_eq!(workflow.nodes[0].line_number, Some(3));

    let without = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(without.nodes[0].line_number, None);
}

#[test]
fn test_custom_keys_become_extra_columns() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.R", "#put id:\"a\", owner:\"data-team\", stage:\"dev\"\n");

    let workflow = extract(dir.path(), &ScanOptions::default()).unwrap();
    let node = &workflow.nodes[0];
    assert_eq!(node.extra.get("owner").map(String::as_str), Some("data-team"));
    assert_eq!(node.extra.get("stage").map(String::as_str), Some("dev"));

    let columns = workflow.columns();
    let owner_idx = columns.iter().position(|c| c == "owner").unwrap();
    let stage_idx = columns.iter().position(|c| c == "stage").unwrap();
    assert!(owner_idx < stage_idx);
}

#[test]
fn test_recursive_and_exclude() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::create_dir(dir.path().join("drafts")).unwrap();
    write_file(&dir, "top.R", "#put id:\"top\"\n");
    fs::write(
        dir.path().join("nested/deep.R"),
        "#put id:\"deep\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("drafts/skip.R"),
        "#put id:\"skip\"\n",
    )
    .unwrap();

    let flat = extract(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(flat.node_count(), 1);

    let options = ScanOptions {
        recursive: true,
        exclude: vec!["drafts".to_string()],
        ..ScanOptions::default()
    };
    let recursive = extract(dir.path(), &options).unwrap();
    let ids: Vec<&str> = recursive.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(recursive.node_count(), 2);
    assert!(ids.contains(&"top") && ids.contains(&"deep"));
}

#[test]
fn test_block_comment_annotations_in_c() {
    let dir = TempDir::new().unwrap();
    let options = ScanOptions {
        include_pattern: r"\.c$".to_string(),
        ..ScanOptions::default()
    };
    write_file(
        &dir,
        "main.c",
        "/*\n * put id:\"compile\", output:\"a.out\"\n */\nint main() { return 0; }\n",
    );

    let workflow = extract(dir.path(), &options).unwrap();
    assert_eq!(workflow.node_count(), 1);
    assert_eq!(workflow.nodes[0].id, "compile");
    assert_eq!(workflow.nodes[0].output.as_deref(), Some("a.out"));
}

#[test]
fn test_nonexistent_path_is_fatal() {
    assert!(extract(
        std::path::Path::new("/no/such/place"),
        &ScanOptions::default()
    )
    .is_err());
}
