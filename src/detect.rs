//! Auto-detector: infers likely inputs and outputs from unannotated
//! code by line-scanning against the detection pattern library.
//!
//! Intentionally regex-based and line-oriented; no AST. False positives
//! and negatives are accepted in exchange for language count.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::errors::Result;
use crate::language::resolve_language;
use crate::options::AutoOptions;
use crate::patterns::compiled_patterns;
use crate::scanner::discover_files;
use crate::workflow::{Workflow, WorkflowNode, WorkflowSource};

/// Literals that look boolean/NA-ish and never count as paths.
const NON_PATH_LITERALS: &[&str] = &[
    "true", "false", "TRUE", "FALSE", "True", "False", "NA", "NULL", "null", "None", "nil",
];

/// Scans `path` and infers one workflow row per file with any detected
/// I/O. Files whose language has no pattern entry still contribute a
/// minimal row so every file appears in the workflow.
pub fn auto_detect(path: &Path, options: &AutoOptions) -> Result<Workflow> {
    let files = discover_files(
        path,
        options.recursive,
        &options.include_pattern,
        &options.exclude,
    )?;

    let mut workflow = Workflow::new(WorkflowSource::AutoDetected);

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

    for file in &files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let info = resolve_language(&file_name);

        let mut node = WorkflowNode::new(&file_name, &file.display().to_string(), info.language);
        node.id = sanitize_file_id(&file_name);
        node.auto_detected = true;

        let patterns = info.language.and_then(compiled_patterns);

        let mut inputs: Vec<String> = Vec::new();
        let mut outputs: Vec<String> = Vec::new();
        let mut first_match_line: Option<u32> = None;

        if let Some(patterns) = patterns {
            let contents = match fs::read_to_string(file) {
                Ok(c) => c,
                Err(e) => {
                    let message =
                        format!("skipping unreadable file '{}': {}", file.display(), e);
                    warn!("{}", message);
                    workflow.warnings.push(message);
                    continue;
                }
            };

            for (idx, line) in contents.lines().enumerate() {
                let mut matched = false;
                if options.detect_inputs
                    && patterns.input.iter().any(|p| p.regex.is_match(line))
                {
                    matched = true;
                    for literal in quoted_literals(line) {
                        if looks_like_path(&literal) && !inputs.contains(&literal) {
                            inputs.push(literal);
                        }
                    }
                }
                if options.detect_outputs
                    && patterns.output.iter().any(|p| p.regex.is_match(line))
                {
                    matched = true;
                    for literal in quoted_literals(line) {
                        if looks_like_path(&literal) && !outputs.contains(&literal) {
                            outputs.push(literal);
                        }
                    }
                }
                if matched && first_match_line.is_none() {
                    first_match_line = Some((idx + 1) as u32);
                }
            }
        }

        // Node type from the detected sets, before output defaulting.
        node.node_type = Some(
            match (!inputs.is_empty(), !outputs.is_empty()) {
                (false, true) => "input",
                (true, false) => "output",
                _ => "process",
            }
            .to_string(),
        );

        if !inputs.is_empty() {
            node.input = Some(inputs.join(", "));
        }
        node.output = if outputs.is_empty() {
            Some(file_name.clone())
        } else {
            Some(outputs.join(", "))
        };
        if options.include_line_numbers {
            node.line_number = first_match_line;
        }

        workflow.nodes.push(node);
    }

    Ok(workflow)
}

/// Derives a diagram-safe id from a file base name: special characters
/// and hyphens become underscores.
pub fn sanitize_file_id(file_name: &str) -> String {
    let mut id = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c.to_ascii_lowercase());
        } else if !id.ends_with('_') {
            id.push('_');
        }
    }
    id.trim_matches('_').to_string()
}

/// Extracts every quoted string literal (either quote style) on a line.
fn quoted_literals(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'"' || c == b'\'' {
            if let Some(rel) = line[i + 1..].find(c as char) {
                literals.push(line[i + 1..i + 1 + rel].to_string());
                i += rel + 2;
                continue;
            }
        }
        i += 1;
    }
    literals
}

/// Permissive "is this a file path" heuristic for quoted literals.
///
/// Accepts strings with a path separator or a short alphanumeric
/// extension. Rejects empties, whitespace-containing strings,
/// boolean/NA-like literals, and bare URLs.
fn looks_like_path(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    if NON_PATH_LITERALS.contains(&s) {
        return false;
    }
    if s.starts_with("http://") || s.starts_with("https://") {
        return false;
    }
    if s.contains('/') || s.contains('\\') {
        return true;
    }
    match s.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (1..=10).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}
