//! Merge engine: reconciles manual annotations with auto-detected rows
//! for the same file set.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::detect::auto_detect;
use crate::errors::{PutError, Result};
use crate::extract::extract;
use crate::options::{AutoOptions, ScanOptions};
use crate::workflow::{Workflow, WorkflowNode, WorkflowSource};

/// Reconciliation policy between manual and auto-detected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Manual fields win outright; auto-detection only fills fields the
    /// annotation never set.
    ManualPriority,
    /// Manual fields are kept when present and non-empty; empty or
    /// absent fields are filled from auto-detection.
    Supplement,
    /// `input`/`output` lists are concatenated and deduplicated (manual
    /// items first); every other field behaves as in `Supplement`.
    /// When the same scalar field is set on both sides, the manual
    /// value wins.
    Union,
}

impl FromStr for MergeStrategy {
    type Err = PutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "manual_priority" => Ok(MergeStrategy::ManualPriority),
            "supplement" => Ok(MergeStrategy::Supplement),
            "union" => Ok(MergeStrategy::Union),
            other => Err(PutError::InvalidOption {
                message: format!(
                    "unknown merge strategy '{}' (expected manual_priority, supplement, or union)",
                    other
                ),
            }),
        }
    }
}

/// Options for a merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOptions {
    pub scan: ScanOptions,
    pub auto: AutoOptions,
    pub strategy: MergeStrategy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            scan: ScanOptions::default(),
            auto: AutoOptions::default(),
            strategy: MergeStrategy::Supplement,
        }
    }
}

/// Runs the extractor and the auto-detector over the same path and
/// reconciles their rows per file under the chosen strategy.
///
/// Files with only one kind of result keep it as-is. A file with
/// multiple manual annotations merges each of them against the file's
/// single aggregate auto row.
pub fn merge(path: &Path, options: &MergeOptions) -> Result<Workflow> {
    let manual = extract(path, &options.scan)?;
    let auto = auto_detect(path, &options.auto)?;

    let mut workflow = Workflow::new(WorkflowSource::Merged);
    for warning in manual.warnings.iter().chain(auto.warnings.iter()) {
        if !workflow.warnings.contains(warning) {
            workflow.warnings.push(warning.clone());
        }
    }

    for manual_node in &manual.nodes {
        match auto.nodes.iter().find(|a| a.file_path == manual_node.file_path) {
            Some(auto_node) => {
                workflow
                    .nodes
                    .push(merge_row(manual_node, auto_node, options.strategy));
            }
            None => workflow.nodes.push(manual_node.clone()),
        }
    }

    for auto_node in &auto.nodes {
        let has_manual = manual
            .nodes
            .iter()
            .any(|m| m.file_path == auto_node.file_path);
        if !has_manual {
            workflow.nodes.push(auto_node.clone());
        }
    }

    Ok(workflow)
}

/// Merges one manual row against the file's auto row.
fn merge_row(manual: &WorkflowNode, auto: &WorkflowNode, strategy: MergeStrategy) -> WorkflowNode {
    let mut node = manual.clone();
    let mut used_auto = false;

    node.label = pick_scalar(&manual.label, &auto.label, strategy, &mut used_auto);
    node.node_type = pick_scalar(&manual.node_type, &auto.node_type, strategy, &mut used_auto);

    match strategy {
        MergeStrategy::Union => {
            node.input = union_lists(&manual.input, &auto.input, &mut used_auto);
            node.output = union_lists(&manual.output, &auto.output, &mut used_auto);
        }
        _ => {
            node.input = pick_scalar(&manual.input, &auto.input, strategy, &mut used_auto);
            node.output = pick_scalar(&manual.output, &auto.output, strategy, &mut used_auto);
        }
    }

    if node.line_number.is_none() && auto.line_number.is_some() {
        node.line_number = auto.line_number;
        used_auto = true;
    }

    node.auto_detected = used_auto;
    node
}

/// Scalar field reconciliation. `ManualPriority` fills only wholly
/// absent fields; `Supplement` (and `Union` for scalars) also fills
/// present-but-empty ones.
fn pick_scalar(
    manual: &Option<String>,
    auto: &Option<String>,
    strategy: MergeStrategy,
    used_auto: &mut bool,
) -> Option<String> {
    let take_auto = match strategy {
        MergeStrategy::ManualPriority => manual.is_none(),
        MergeStrategy::Supplement | MergeStrategy::Union => {
            manual.as_deref().map_or(true, |v| v.trim().is_empty())
        }
    };
    if take_auto && auto.is_some() {
        *used_auto = true;
        auto.clone()
    } else {
        manual.clone()
    }
}

/// Concatenates two comma-lists, manual items first, deduplicated.
fn union_lists(
    manual: &Option<String>,
    auto: &Option<String>,
    used_auto: &mut bool,
) -> Option<String> {
    let mut items = manual.as_deref().map(WorkflowNode::split_list).unwrap_or_default();
    for item in auto.as_deref().map(WorkflowNode::split_list).unwrap_or_default() {
        if !items.contains(&item) {
            items.push(item);
            *used_auto = true;
        }
    }
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}
