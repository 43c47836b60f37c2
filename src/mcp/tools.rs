//! Tool definitions and dispatch for the MCP server.
//!
//! Each tool maps to one core entry point. Tool definitions carry JSON
//! Schema descriptions so MCP clients can discover capabilities. Path
//! parameters are sanitized before they reach the core: traversal
//! sequences and control characters downgrade to `.` with a warning
//! rather than failing, since the caller is usually an automated agent
//! that should keep functioning.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::diagram::{output::fenced, render, DiagramOptions, Direction};
use crate::errors::{PutError, Result};
use crate::language::known_languages;
use crate::merge::{merge, MergeOptions, MergeStrategy};
use crate::options::{AutoOptions, ScanOptions};
use crate::{auto_detect, extract};

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

/// Append-only store of completed run results, keyed by generated run
/// id. Point lookups only; the transport serializes access.
pub struct RunStore {
    runs: Mutex<HashMap<String, Value>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self {
            runs: Mutex::new(HashMap::new()),
        }
    }

    /// Stores a completed result and returns its run id.
    ///
    /// The id must always resolve, so a poisoned lock is recovered
    /// rather than dropping the result.
    pub fn insert(&self, result: Value) -> String {
        let run_id = Uuid::new_v4().to_string();
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.insert(run_id.clone(), result);
        run_id
    }

    pub fn get(&self, run_id: &str) -> Option<Value> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.get(run_id).cloned()
    }
}

impl Default for RunStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Operations the free-text request handler recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scan,
    Diagram,
    Auto,
    Generate,
    Merge,
    Help,
    Skills,
}

/// Detects the intended operation from free-text input.
pub fn detect_operation(text: &str) -> Operation {
    let lower = text.to_lowercase();
    if lower.contains("skill") {
        Operation::Skills
    } else if lower.contains("help") {
        Operation::Help
    } else if lower.contains("merge") {
        Operation::Merge
    } else if lower.contains("generate") {
        Operation::Generate
    } else if lower.contains("auto") || lower.contains("detect") {
        Operation::Auto
    } else if lower.contains("diagram") || lower.contains("chart") || lower.contains("mermaid") {
        Operation::Diagram
    } else {
        Operation::Scan
    }
}

/// Extracts simple parameters from free-text input: a quoted path,
/// `theme=` / `direction=` / `strategy=` assignments, and the
/// "recursively" / "artifacts" flags. Returns arguments suitable for
/// [`handle_tool_call`].
pub fn extract_request_params(text: &str) -> Value {
    let mut args = serde_json::Map::new();

    for quote in ['"', '\''] {
        if let Some(start) = text.find(quote) {
            if let Some(len) = text[start + 1..].find(quote) {
                let candidate = &text[start + 1..start + 1 + len];
                if !candidate.is_empty() {
                    args.insert("path".to_string(), Value::String(candidate.to_string()));
                    break;
                }
            }
        }
    }

    for key in ["theme", "direction", "strategy"] {
        if let Some(pos) = text.find(&format!("{}=", key)) {
            let rest = &text[pos + key.len() + 1..];
            let value: String = rest
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != ',')
                .collect();
            if !value.is_empty() {
                args.insert(key.to_string(), Value::String(value));
            }
        }
    }

    let lower = text.to_lowercase();
    if lower.contains("recursively") || lower.contains("recursive") {
        args.insert("recursive".to_string(), Value::Bool(true));
    }
    if lower.contains("artifact") {
        args.insert("show_artifacts".to_string(), Value::Bool(true));
    }

    Value::Object(args)
}

/// Maps a free-text operation to the tool that serves it.
pub fn tool_for_operation(op: Operation) -> Option<&'static str> {
    match op {
        Operation::Scan => Some("putgraph_scan"),
        Operation::Auto => Some("putgraph_auto"),
        Operation::Merge => Some("putgraph_merge"),
        Operation::Diagram | Operation::Generate => Some("putgraph_diagram"),
        Operation::Help | Operation::Skills => None,
    }
}

/// Sanitizes a path parameter from an untrusted caller.
///
/// Directory-traversal sequences and control characters downgrade to
/// the current directory with a warning instead of an error.
pub fn sanitize_path_param(path: &str) -> String {
    let suspicious = path.contains("..") || path.chars().any(|c| c.is_control());
    if suspicious {
        warn!(path, "suspicious path parameter, using '.' instead");
        ".".to_string()
    } else if path.trim().is_empty() {
        ".".to_string()
    } else {
        path.trim().to_string()
    }
}

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// All tool definitions this server exposes.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    let path_prop = json!({
        "type": "string",
        "description": "File or directory to scan (default: current directory)"
    });
    let recursive_prop = json!({
        "type": "boolean",
        "description": "Recurse into subdirectories (default: false)"
    });
    vec![
        ToolDefinition {
            name: "putgraph_scan".to_string(),
            description: "Scan source files for PUT workflow annotations and return the workflow table.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": path_prop,
                    "recursive": recursive_prop,
                    "validate": {
                        "type": "boolean",
                        "description": "Report structural issues in annotations (default: true)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "putgraph_auto".to_string(),
            description: "Auto-detect likely inputs and outputs from unannotated code using per-language patterns.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": path_prop,
                    "recursive": recursive_prop,
                    "detect_inputs": { "type": "boolean", "description": "Scan input patterns (default: true)" },
                    "detect_outputs": { "type": "boolean", "description": "Scan output patterns (default: true)" }
                }
            }),
        },
        ToolDefinition {
            name: "putgraph_merge".to_string(),
            description: "Reconcile manual annotations with auto-detected results under a merge strategy.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": path_prop,
                    "recursive": recursive_prop,
                    "strategy": {
                        "type": "string",
                        "enum": ["manual_priority", "supplement", "union"],
                        "description": "Merge strategy (default: supplement)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "putgraph_diagram".to_string(),
            description: "Scan for annotations and render the workflow as a Mermaid flowchart.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": path_prop,
                    "recursive": recursive_prop,
                    "direction": {
                        "type": "string",
                        "enum": ["TD", "TB", "LR", "RL", "BT"],
                        "description": "Flowchart direction (default: TD)"
                    },
                    "theme": { "type": "string", "description": "Named theme (default: light)" },
                    "show_artifacts": { "type": "boolean", "description": "Render shared files as artifact nodes" }
                }
            }),
        },
        ToolDefinition {
            name: "putgraph_languages".to_string(),
            description: "List supported languages, optionally restricted to those with detection patterns.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "detection_only": {
                        "type": "boolean",
                        "description": "Only languages with detection pattern entries"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "putgraph_request".to_string(),
            description: "Handle a free-text request by detecting the intended operation and forwarding to the matching tool.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "request": {
                        "type": "string",
                        "description": "Free-text request, e.g. 'diagram \"./analysis\" recursively theme=dark'"
                    }
                },
                "required": ["request"]
            }),
        },
        ToolDefinition {
            name: "putgraph_get_run".to_string(),
            description: "Retrieve the stored result of a previous run by its run id.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "run_id": { "type": "string", "description": "Run id returned by a previous tool call" }
                },
                "required": ["run_id"]
            }),
        },
    ]
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn bool_arg(args: &Value, key: &str, default: bool) -> bool {
    args.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Response for free-text requests that map to no tool.
fn usage_text(op: Operation) -> String {
    match op {
        Operation::Skills => concat!(
            "PUT annotations are structured comments describing workflow steps:\n",
            "  #put id:\"load\", label:\"Load data\", node_type:\"input\", output:\"data.csv\"\n",
            "Recognized keys: id, label, node_type, input, output; any other key\n",
            "becomes a custom column. input/output take comma-separated file lists,\n",
            "and a shared file name links two steps with an edge. Outputs ending in\n",
            ".internal are kept out of the diagram."
        )
        .to_string(),
        _ => {
            let tools = get_tool_definitions();
            let mut text = String::from("Available tools:\n");
            for tool in tools {
                text.push_str(&format!("  {} - {}\n", tool.name, tool.description));
            }
            text
        }
    }
}

/// Dispatches one tool call, returning the text content for the client.
pub fn handle_tool_call(name: &str, args: &Value, store: &RunStore) -> Result<String> {
    let text = match name {
        "putgraph_scan" => {
            let path = sanitize_path_param(str_arg(args, "path").unwrap_or("."));
            let options = ScanOptions {
                recursive: bool_arg(args, "recursive", false),
                validate: bool_arg(args, "validate", true),
                ..ScanOptions::default()
            };
            let workflow = extract(Path::new(&path), &options)?;
            let run_id = store.insert(serde_json::to_value(&workflow)?);
            format!(
                "{}\nrun_id: {}\n{}",
                workflow.summary(),
                run_id,
                serde_json::to_string_pretty(&workflow.nodes)?
            )
        }
        "putgraph_auto" => {
            let path = sanitize_path_param(str_arg(args, "path").unwrap_or("."));
            let options = AutoOptions {
                recursive: bool_arg(args, "recursive", false),
                detect_inputs: bool_arg(args, "detect_inputs", true),
                detect_outputs: bool_arg(args, "detect_outputs", true),
                ..AutoOptions::default()
            };
            let workflow = auto_detect(Path::new(&path), &options)?;
            let run_id = store.insert(serde_json::to_value(&workflow)?);
            format!(
                "{}\nrun_id: {}\n{}",
                workflow.summary(),
                run_id,
                serde_json::to_string_pretty(&workflow.nodes)?
            )
        }
        "putgraph_merge" => {
            let path = sanitize_path_param(str_arg(args, "path").unwrap_or("."));
            let strategy = match str_arg(args, "strategy") {
                Some(s) => s.parse::<MergeStrategy>()?,
                None => MergeStrategy::Supplement,
            };
            let recursive = bool_arg(args, "recursive", false);
            let options = MergeOptions {
                scan: ScanOptions {
                    recursive,
                    ..ScanOptions::default()
                },
                auto: AutoOptions {
                    recursive,
                    ..AutoOptions::default()
                },
                strategy,
            };
            let workflow = merge(Path::new(&path), &options)?;
            let run_id = store.insert(serde_json::to_value(&workflow)?);
            format!(
                "{}\nrun_id: {}\n{}",
                workflow.summary(),
                run_id,
                serde_json::to_string_pretty(&workflow.nodes)?
            )
        }
        "putgraph_diagram" => {
            let path = sanitize_path_param(str_arg(args, "path").unwrap_or("."));
            let options = ScanOptions {
                recursive: bool_arg(args, "recursive", false),
                ..ScanOptions::default()
            };
            let workflow = extract(Path::new(&path), &options)?;
            let diagram_options = DiagramOptions {
                direction: match str_arg(args, "direction") {
                    Some(d) => d.parse::<Direction>()?,
                    None => Direction::Td,
                },
                theme: str_arg(args, "theme").unwrap_or("light").to_string(),
                show_artifacts: bool_arg(args, "show_artifacts", false),
                ..DiagramOptions::default()
            };
            let mermaid = render(&workflow, &diagram_options)?;
            store.insert(Value::String(mermaid.clone()));
            fenced(&mermaid)
        }
        "putgraph_languages" => {
            let detection_only = bool_arg(args, "detection_only", false);
            known_languages(detection_only).join("\n")
        }
        "putgraph_request" => {
            let request = str_arg(args, "request").ok_or_else(|| PutError::InvalidOption {
                message: "request text is required".to_string(),
            })?;
            let op = detect_operation(request);
            match tool_for_operation(op) {
                Some(tool) => return handle_tool_call(tool, &extract_request_params(request), store),
                None => usage_text(op),
            }
        }
        "putgraph_get_run" => {
            let run_id = str_arg(args, "run_id").ok_or_else(|| PutError::InvalidOption {
                message: "run_id is required".to_string(),
            })?;
            match store.get(run_id) {
                Some(result) => serde_json::to_string_pretty(&result)?,
                None => format!("no stored run with id '{}'", run_id),
            }
        }
        other => {
            return Err(PutError::InvalidOption {
                message: format!("unknown tool '{}'", other),
            })
        }
    };

    if text.len() > MAX_RESPONSE_CHARS {
        let mut cut = MAX_RESPONSE_CHARS;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut truncated = text[..cut].to_string();
        truncated.push_str("\n... (truncated)");
        Ok(truncated)
    } else {
        Ok(text)
    }
}
