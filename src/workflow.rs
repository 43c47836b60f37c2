use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Node types the validator and renderer recognize.
///
/// This is a soft enumeration: unrecognized values pass through with a
/// validation warning so that custom node types round-trip unchanged.
pub const RECOGNIZED_NODE_TYPES: &[&str] =
    &["input", "process", "output", "decision", "start", "end"];

/// Pseudo-extension marking an in-memory, non-persisted value.
///
/// `.internal` outputs never participate in cross-file edge inference.
pub const INTERNAL_SUFFIX: &str = ".internal";

/// One workflow step: a single row of the workflow table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub file_name: String,
    pub file_path: String,
    /// Canonical language of the source file, when known.
    pub file_type: Option<String>,
    /// Unique-within-workflow identifier. Auto-generated when the
    /// annotation author omitted it; empty only when explicitly written
    /// as empty (a validation warning, not an error).
    pub id: String,
    pub label: Option<String>,
    pub node_type: Option<String>,
    /// Comma-separated list of input file references.
    pub input: Option<String>,
    /// Comma-separated list of output file references.
    pub output: Option<String>,
    /// 1-based line where the logical annotation begins, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Set on rows produced or touched by the auto-detector.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_detected: bool,
    /// Custom annotation keys beyond the fixed columns, alphabetized.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", flatten)]
    pub extra: BTreeMap<String, String>,
}

impl WorkflowNode {
    /// Creates a node with provenance fields set and everything else empty.
    pub fn new(file_name: &str, file_path: &str, file_type: Option<&str>) -> Self {
        WorkflowNode {
            file_name: file_name.to_string(),
            file_path: file_path.to_string(),
            file_type: file_type.map(|s| s.to_string()),
            id: String::new(),
            label: None,
            node_type: None,
            input: None,
            output: None,
            line_number: None,
            auto_detected: false,
            extra: BTreeMap::new(),
        }
    }

    /// Splits a comma-separated file-reference list into trimmed tokens.
    pub fn split_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }

    /// Input tokens for this node.
    pub fn inputs(&self) -> Vec<String> {
        self.input.as_deref().map(Self::split_list).unwrap_or_default()
    }

    /// Output tokens for this node.
    pub fn outputs(&self) -> Vec<String> {
        self.output.as_deref().map(Self::split_list).unwrap_or_default()
    }
}

/// Which subsystem produced a workflow table.
///
/// Carried on the table itself so printing and summary helpers can
/// specialize without inspecting row contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowSource {
    Annotations,
    AutoDetected,
    Merged,
}

/// The workflow table: the sole interchange value between the extractor,
/// auto-detector, merge engine, and the diagram renderer.
///
/// Built once per call and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub source: WorkflowSource,
    pub nodes: Vec<WorkflowNode>,
    /// Non-fatal issues collected during the run (validation findings,
    /// duplicate ids, empty file sets). Also emitted via `tracing::warn!`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Workflow {
    /// Creates an empty workflow table for the given producer.
    pub fn new(source: WorkflowSource) -> Self {
        Workflow {
            source,
            nodes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct source files contributing rows.
    pub fn file_count(&self) -> usize {
        let mut files: Vec<&str> = self.nodes.iter().map(|n| n.file_path.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }

    /// Histogram of `node_type` values across all rows.
    ///
    /// Rows without a node type count under `"(none)"`.
    pub fn node_type_counts(&self) -> HashMap<String, u64> {
        let mut counts = HashMap::new();
        for node in &self.nodes {
            let key = node.node_type.as_deref().unwrap_or("(none)").to_string();
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// Fixed columns followed by the alphabetized union of custom keys
    /// seen across all rows.
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = [
            "file_name",
            "file_path",
            "file_type",
            "id",
            "label",
            "node_type",
            "input",
            "output",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if self.nodes.iter().any(|n| n.line_number.is_some()) {
            cols.push("line_number".to_string());
        }
        let mut custom: Vec<String> = Vec::new();
        for node in &self.nodes {
            for key in node.extra.keys() {
                if !custom.contains(key) {
                    custom.push(key.clone());
                }
            }
        }
        custom.sort();
        cols.extend(custom);
        cols
    }

    /// Tabular view of the workflow: one string cell per column per row,
    /// with `NA` marking missing values.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.nodes
            .iter()
            .map(|node| {
                columns
                    .iter()
                    .map(|col| match col.as_str() {
                        "file_name" => node.file_name.clone(),
                        "file_path" => node.file_path.clone(),
                        "file_type" => node.file_type.clone().unwrap_or_else(|| "NA".into()),
                        "id" => node.id.clone(),
                        "label" => node.label.clone().unwrap_or_else(|| "NA".into()),
                        "node_type" => node.node_type.clone().unwrap_or_else(|| "NA".into()),
                        "input" => node.input.clone().unwrap_or_else(|| "NA".into()),
                        "output" => node.output.clone().unwrap_or_else(|| "NA".into()),
                        "line_number" => node
                            .line_number
                            .map(|l| l.to_string())
                            .unwrap_or_else(|| "NA".into()),
                        custom => node
                            .extra
                            .get(custom)
                            .cloned()
                            .unwrap_or_else(|| "NA".into()),
                    })
                    .collect()
            })
            .collect()
    }

    /// One-paragraph human summary: node count, file count, and the
    /// node-type histogram.
    pub fn summary(&self) -> String {
        let kind = match self.source {
            WorkflowSource::Annotations => "PUT workflow",
            WorkflowSource::AutoDetected => "auto-detected workflow",
            WorkflowSource::Merged => "merged workflow",
        };
        let mut out = format!(
            "{}: {} node(s) across {} file(s)",
            kind,
            self.node_count(),
            self.file_count()
        );
        let counts = self.node_type_counts();
        if !counts.is_empty() {
            let mut sorted: Vec<_> = counts.into_iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            let parts: Vec<String> = sorted
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            out.push_str(&format!(" ({})", parts.join(", ")));
        }
        out
    }
}
