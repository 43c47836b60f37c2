//! Advisory structural checks on parsed annotations.
//!
//! Findings are warnings only; a flagged annotation is always kept.

use crate::language::is_extensionless_known;
use crate::workflow::{WorkflowNode, RECOGNIZED_NODE_TYPES};

/// Inspects parsed `key -> value` pairs and returns any structural
/// issues found. Never fails and never rejects the annotation.
pub fn validate_annotation(pairs: &[(String, String)], line: &str) -> Vec<String> {
    let mut issues = Vec::new();

    match pairs.iter().find(|(k, _)| k == "id") {
        None => issues.push("no id specified, one will be generated".to_string()),
        Some((_, v)) if v.trim().is_empty() => {
            issues.push("missing or empty id".to_string());
        }
        Some(_) => {}
    }

    if let Some((_, node_type)) = pairs.iter().find(|(k, _)| k == "node_type") {
        if !node_type.is_empty() && !RECOGNIZED_NODE_TYPES.contains(&node_type.as_str()) {
            issues.push(format!(
                "unusual node_type '{}' (recognized: {})",
                node_type,
                RECOGNIZED_NODE_TYPES.join(", ")
            ));
        }
    }

    for field in ["input", "output"] {
        if let Some((_, value)) = pairs.iter().find(|(k, _)| k == field) {
            for token in WorkflowNode::split_list(value) {
                if !has_extension(&token) && !is_extensionless_known(&token) {
                    issues.push(format!(
                        "{} file '{}' appears to be missing an extension",
                        field, token
                    ));
                }
            }
        }
    }

    if !issues.is_empty() {
        tracing::debug!(line, ?issues, "annotation validation findings");
    }
    issues
}

/// Whether a file reference carries a dot-delimited extension.
fn has_extension(token: &str) -> bool {
    match token.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}
