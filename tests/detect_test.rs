use std::fs;

use putgraph::auto_detect;
use putgraph::options::AutoOptions;
use putgraph::workflow::WorkflowSource;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_detects_r_inputs_and_outputs() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "pipeline.R",
        concat!(
            "library(dplyr)\n",
            "raw <- read.csv(\"raw.csv\")\n",
            "clean <- raw |> filter(!is.na(x))\n",
            "write.csv(clean, \"clean.csv\")\n",
        ),
    );

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    assert_eq!(workflow.source, WorkflowSource::AutoDetected);
    assert_eq!(workflow.node_count(), 1);

    let node = &workflow.nodes[0];
    assert!(node.auto_detected);
    assert_eq!(node.id, "pipeline_r");
    assert_eq!(node.input.as_deref(), Some("raw.csv"));
    assert_eq!(node.output.as_deref(), Some("clean.csv"));
    assert_eq!(node.node_type.as_deref(), Some("process"));
}

#[test]
fn test_node_type_inference() {
    let dir = TempDir::new().unwrap();
    // Produces only: a source of the workflow.
    write_file(&dir, "generate.R", "write.csv(df, \"data.csv\")\n");
    // Consumes only: a sink.
    write_file(&dir, "report.R", "df <- read.csv(\"data.csv\")\n");

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    let generate = workflow.nodes.iter().find(|n| n.id == "generate_r").unwrap();
    let report = workflow.nodes.iter().find(|n| n.id == "report_r").unwrap();
    assert_eq!(generate.node_type.as_deref(), Some("input"));
    assert_eq!(report.node_type.as_deref(), Some("output"));
}

#[test]
fn test_output_defaults_to_file_name_when_nothing_detected() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "helpers.R", "add <- function(a, b) a + b\n");

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    let node = &workflow.nodes[0];
    assert_eq!(node.output.as_deref(), Some("helpers.R"));
    assert_eq!(node.node_type.as_deref(), Some("process"));
}

#[test]
fn test_minimal_row_for_language_without_patterns() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("style.css"), "body { margin: 0; }\n").unwrap();

    let options = AutoOptions {
        include_pattern: r"\.css$".to_string(),
        ..AutoOptions::default()
    };
    let workflow = auto_detect(dir.path(), &options).unwrap();
    assert_eq!(workflow.node_count(), 1);
    let node = &workflow.nodes[0];
    assert!(node.auto_detected);
    assert_eq!(node.input, None);
    assert_eq!(node.output.as_deref(), Some("style.css"));
    assert_eq!(node.node_type.as_deref(), Some("process"));
}

#[test]
fn test_detection_toggles() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "both.py",
        "df = pd.read_csv(\"in.csv\")\ndf.to_csv(\"out.csv\")\n",
    );

    let no_inputs = AutoOptions {
        detect_inputs: false,
        ..AutoOptions::default()
    };
    let workflow = auto_detect(dir.path(), &no_inputs).unwrap();
    assert_eq!(workflow.nodes[0].input, None);
    assert_eq!(workflow.nodes[0].output.as_deref(), Some("out.csv"));

    let no_outputs = AutoOptions {
        detect_outputs: false,
        ..AutoOptions::default()
    };
    let workflow = auto_detect(dir.path(), &no_outputs).unwrap();
    assert_eq!(workflow.nodes[0].input.as_deref(), Some("in.csv"));
    assert_eq!(workflow.nodes[0].output.as_deref(), Some("both.py"));
}

#[test]
fn test_non_path_literals_are_ignored() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "load.R",
        "df <- read.csv(\"data.csv\", stringsAsFactors = \"FALSE\")\n",
    );

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    assert_eq!(workflow.nodes[0].input.as_deref(), Some("data.csv"));
}

#[test]
fn test_duplicate_literals_recorded_once() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "load.R",
        "a <- read.csv(\"data.csv\")\nb <- read.csv(\"data.csv\")\n",
    );

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    assert_eq!(workflow.nodes[0].input.as_deref(), Some("data.csv"));
}

#[test]
fn test_first_match_line_number() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "load.R",
        "library(readr)\n\ndf <- read.csv(\"data.csv\")\n",
    );

    let options = AutoOptions {
        include_line_numbers: true,
        ..AutoOptions::default()
    };
    let workflow = auto_detect(dir.path(), &options).unwrap();
    assert_eq!(workflow.nodes[0].line_number, Some(3));
}

#[test]
fn test_shell_redirection_output() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "run.sh",
        "#!/bin/sh\ncurl -s \"https://example.com/feed\" > \"feed.json\"\n",
    );

    let workflow = auto_detect(dir.path(), &AutoOptions::default()).unwrap();
    let node = &workflow.nodes[0];
    // URL literal rejected by the path heuristic, file literal kept.
    assert_eq!(node.output.as_deref(), Some("feed.json"));
}
