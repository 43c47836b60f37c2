//! The `put` extractor: orchestrates the scanner, joiner, parser, and
//! validator into one workflow table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;
use uuid::Uuid;

use crate::annotation::{collect_annotations, parse_annotation, validate_annotation};
use crate::errors::Result;
use crate::language::{block_comment_syntax, resolve_language};
use crate::options::ScanOptions;
use crate::scanner::discover_files;
use crate::workflow::{Workflow, WorkflowNode, WorkflowSource};

/// Scans `path` for PUT annotations and assembles the workflow table.
///
/// Zero matching files yields an empty table plus a warning; zero
/// annotations in a non-empty file set yields an empty table silently.
/// Problems inside individual files never abort the run.
pub fn extract(path: &Path, options: &ScanOptions) -> Result<Workflow> {
    let files = discover_files(
        path,
        options.recursive,
        &options.include_pattern,
        &options.exclude,
    )?;

    let mut workflow = Workflow::new(WorkflowSource::Annotations);

    if files.is_empty() {
        let message = format!(
            "no files matched pattern '{}' under '{}'",
            options.include_pattern,
            path.display()
        );
        warn!("{}", message);
        workflow.warnings.push(message);
        return Ok(workflow);
    }

    let mut id_counts: HashMap<String, u32> = HashMap::new();
    let mut validation_findings: Vec<String> = Vec::new();

    for file in &files {
        let contents = match fs::read_to_string(file) {
            Ok(c) => c,
            Err(e) => {
                let message = format!("skipping unreadable file '{}': {}", file.display(), e);
                warn!("{}", message);
                workflow.warnings.push(message);
                continue;
            }
        };

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let info = resolve_language(&file_name);
        let block = info.language.and_then(block_comment_syntax);

        let lines: Vec<&str> = contents.lines().collect();
        for raw in collect_annotations(&lines, info.comment_prefix, block) {
            let Some(pairs) = parse_annotation(&raw.text) else {
                continue;
            };

            if options.validate {
                let issues = validate_annotation(&pairs, &raw.text);
                if !issues.is_empty() {
                    validation_findings.push(format!(
                        "{}:{}: {}",
                        file_name,
                        raw.line_number,
                        issues.join("; ")
                    ));
                }
            }

            let mut node = WorkflowNode::new(&file_name, &file.display().to_string(), info.language);
            let mut saw_id = false;
            for (key, value) in pairs {
                match key.as_str() {
                    "id" => {
                        if !saw_id {
                            node.id = value;
                            saw_id = true;
                        }
                    }
                    "label" => {
                        node.label.get_or_insert(value);
                    }
                    "node_type" => {
                        node.node_type.get_or_insert(value);
                    }
                    "input" => {
                        node.input.get_or_insert(value);
                    }
                    "output" => {
                        node.output.get_or_insert(value);
                    }
                    _ => {
                        node.extra.entry(key).or_insert(value);
                    }
                }
            }

            if !saw_id {
                node.id = Uuid::new_v4().to_string();
            }
            if node.output.as_deref().map_or(true, |o| o.trim().is_empty()) {
                node.output = Some(file_name.clone());
            }
            if options.include_line_numbers {
                node.line_number = Some(raw.line_number);
            }

            *id_counts.entry(node.id.clone()).or_insert(0) += 1;
            workflow.nodes.push(node);
        }
    }

    if !validation_findings.is_empty() {
        let message = format!(
            "validation found issues in {} annotation(s): {}",
            validation_findings.len(),
            validation_findings.join(" | ")
        );
        warn!("{}", message);
        workflow.warnings.push(message);
    }

    let mut duplicates: Vec<String> = id_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort();
        let message = format!("duplicate workflow ids: {}", duplicates.join(", "));
        warn!("{}", message);
        workflow.warnings.push(message);
    }

    Ok(workflow)
}
