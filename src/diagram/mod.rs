//! Graph assembly and Mermaid flowchart rendering.
//!
//! Edges are inferred from shared file names: a node consuming a file
//! another node produces gets a directed edge from the producer.

pub mod output;
pub mod theme;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{PutError, Result};
use crate::workflow::{Workflow, WorkflowNode, INTERNAL_SUFFIX};
use theme::Palette;

/// Flowchart layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Direction {
    #[clap(name = "TD")]
    Td,
    #[clap(name = "TB")]
    Tb,
    #[clap(name = "LR")]
    Lr,
    #[clap(name = "RL")]
    Rl,
    #[clap(name = "BT")]
    Bt,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Td => "TD",
            Direction::Tb => "TB",
            Direction::Lr => "LR",
            Direction::Rl => "RL",
            Direction::Bt => "BT",
        }
    }
}

impl FromStr for Direction {
    type Err = PutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TD" => Ok(Direction::Td),
            "TB" => Ok(Direction::Tb),
            "LR" => Ok(Direction::Lr),
            "RL" => Ok(Direction::Rl),
            "BT" => Ok(Direction::Bt),
            other => Err(PutError::InvalidOption {
                message: format!("unknown direction '{}' (expected TD, TB, LR, RL, or BT)", other),
            }),
        }
    }
}

/// How originating-file information is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceInfo {
    /// No source information.
    Off,
    /// File name appended to each node label.
    Inline,
    /// One subgraph per source file.
    Group,
}

/// Protocol used for `click` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClickProtocol {
    Vscode,
    Rstudio,
    File,
}

/// Options controlling diagram rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramOptions {
    pub direction: Direction,
    /// Render node labels; falls back to ids when disabled or missing.
    pub node_labels: bool,
    /// Label inferred edges with the shared file name. Off by default;
    /// plain arrows keep small diagrams readable.
    pub show_files: bool,
    /// Emit `classDef`/`class` styling statements.
    pub style_nodes: bool,
    /// Named theme; unknown names fall back to `light` with a warning.
    pub theme: String,
    /// Custom palette; takes precedence over `theme` when set.
    pub palette: Option<Palette>,
    /// Diagram title rendered as Mermaid frontmatter.
    pub title: Option<String>,
    /// Distinct emphasis styling for `start`/`end` nodes.
    pub show_workflow_boundaries: bool,
    /// Render shared files as intermediate artifact nodes instead of
    /// edge labels.
    pub show_artifacts: bool,
    pub show_source_info: SourceInfo,
    /// Emit `click` directives pointing at source locations.
    pub enable_clicks: bool,
    pub click_protocol: ClickProtocol,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        DiagramOptions {
            direction: Direction::Td,
            node_labels: true,
            show_files: false,
            style_nodes: true,
            theme: "light".to_string(),
            palette: None,
            title: None,
            show_workflow_boundaries: false,
            show_artifacts: false,
            show_source_info: SourceInfo::Off,
            enable_clicks: false,
            click_protocol: ClickProtocol::File,
        }
    }
}

/// Renders a workflow table as Mermaid flowchart text.
///
/// Fails on an empty table or when no row carries a usable id; every
/// other irregularity degrades gracefully.
pub fn render(workflow: &Workflow, options: &DiagramOptions) -> Result<String> {
    if workflow.is_empty() {
        return Err(PutError::Diagram {
            message: "workflow table is empty, nothing to render".to_string(),
        });
    }

    let nodes: Vec<&WorkflowNode> = workflow
        .nodes
        .iter()
        .filter(|n| !n.id.trim().is_empty())
        .collect();
    if nodes.is_empty() {
        return Err(PutError::Diagram {
            message: "no workflow row has a usable id".to_string(),
        });
    }

    let palette = match &options.palette {
        Some(p) => p.clone(),
        None => Palette::named(&options.theme).unwrap_or_else(|| {
            warn!(theme = %options.theme, "unknown theme, falling back to 'light'");
            Palette::default()
        }),
    };

    let ids: Vec<String> = nodes.iter().map(|n| sanitize_node_id(&n.id)).collect();

    let mut out = String::new();
    if let Some(title) = &options.title {
        out.push_str("---\n");
        out.push_str(&format!("title: {}\n", title));
        out.push_str("---\n");
    }
    out.push_str(&format!("flowchart {}\n", options.direction.as_str()));

    // Node definitions, optionally grouped into one subgraph per file.
    match options.show_source_info {
        SourceInfo::Group => {
            let mut by_file: Vec<(&str, Vec<usize>)> = Vec::new();
            for (idx, node) in nodes.iter().enumerate() {
                match by_file.iter_mut().find(|(f, _)| *f == node.file_name) {
                    Some((_, members)) => members.push(idx),
                    None => by_file.push((&node.file_name, vec![idx])),
                }
            }
            for (file, members) in by_file {
                out.push_str(&format!("    subgraph {}\n", quote_label(file)));
                for idx in members {
                    out.push_str("    ");
                    out.push_str(&node_definition(nodes[idx], &ids[idx], options));
                }
                out.push_str("    end\n");
            }
        }
        _ => {
            for (idx, node) in nodes.iter().enumerate() {
                out.push_str(&node_definition(node, &ids[idx], options));
            }
        }
    }

    // Map every non-internal output token to its producers.
    let mut producers: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        for token in node.outputs() {
            if token.ends_with(INTERNAL_SUFFIX) {
                continue;
            }
            producers.entry(token).or_default().push(idx);
        }
    }

    let mut edges: Vec<String> = Vec::new();
    let mut artifacts: Vec<(String, String)> = Vec::new();

    for (consumer_idx, node) in nodes.iter().enumerate() {
        for token in node.inputs() {
            if token.ends_with(INTERNAL_SUFFIX) {
                continue;
            }
            let Some(producer_idxs) = producers.get(token.as_str()) else {
                continue;
            };
            for &producer_idx in producer_idxs {
                if producer_idx == consumer_idx {
                    continue;
                }
                if options.show_artifacts {
                    let art_id = format!("art_{}", sanitize_node_id(&token));
                    if !artifacts.iter().any(|(id, _)| *id == art_id) {
                        artifacts.push((art_id.clone(), token.clone()));
                    }
                    push_unique(&mut edges, format!("    {} --> {}\n", ids[producer_idx], art_id));
                    push_unique(&mut edges, format!("    {} --> {}\n", art_id, ids[consumer_idx]));
                } else if options.show_files {
                    push_unique(
                        &mut edges,
                        format!(
                            "    {} -->|{}| {}\n",
                            ids[producer_idx],
                            quote_label(&token),
                            ids[consumer_idx]
                        ),
                    );
                } else {
                    push_unique(
                        &mut edges,
                        format!("    {} --> {}\n", ids[producer_idx], ids[consumer_idx]),
                    );
                }
            }
        }
    }

    for (art_id, token) in &artifacts {
        out.push_str(&format!("    {}[({})]\n", art_id, quote_label(token)));
    }
    for edge in &edges {
        out.push_str(edge);
    }

    if options.style_nodes {
        write_styles(&mut out, &nodes, &ids, &artifacts, &palette, options);
    }

    if options.enable_clicks {
        for (idx, node) in nodes.iter().enumerate() {
            out.push_str(&click_directive(node, &ids[idx], options.click_protocol));
        }
    }

    Ok(out)
}

fn push_unique(edges: &mut Vec<String>, edge: String) {
    if !edges.contains(&edge) {
        edges.push(edge);
    }
}

/// Renders one node definition line with its shape.
fn node_definition(node: &WorkflowNode, id: &str, options: &DiagramOptions) -> String {
    let mut text = if options.node_labels {
        match node.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label.to_string(),
            _ => node.id.clone(),
        }
    } else {
        node.id.clone()
    };
    if options.show_source_info == SourceInfo::Inline {
        text.push_str(&format!("<br/><i>{}</i>", node.file_name));
    }
    let label = quote_label(&text);

    let shape = match node.node_type.as_deref() {
        Some("input") | Some("start") | Some("end") => format!("{}([{}])", id, label),
        Some("output") => format!("{}[[{}]]", id, label),
        Some("decision") => format!("{}{{{}}}", id, label),
        _ => format!("{}[{}]", id, label),
    };
    format!("    {}\n", shape)
}

fn write_styles(
    out: &mut String,
    nodes: &[&WorkflowNode],
    ids: &[String],
    artifacts: &[(String, String)],
    palette: &Palette,
    options: &DiagramOptions,
) {
    // Group node ids by effective style class, in first-seen order.
    let mut groups: Vec<(&'static str, Vec<&str>)> = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        let class = style_class(node.node_type.as_deref(), options.show_workflow_boundaries);
        match groups.iter_mut().find(|(c, _)| *c == class) {
            Some((_, members)) => members.push(&ids[idx]),
            None => groups.push((class, vec![&ids[idx]])),
        }
    }
    if !artifacts.is_empty() {
        groups.push(("artifact", artifacts.iter().map(|(id, _)| id.as_str()).collect()));
    }

    for (class, _) in &groups {
        let style = palette.style_for(class);
        let emphasis = if options.show_workflow_boundaries && matches!(*class, "start" | "end") {
            ",stroke-width:3px"
        } else {
            ""
        };
        out.push_str(&format!(
            "    classDef {}Style fill:{},stroke:{},color:{}{}\n",
            class, style.fill, style.stroke, style.color, emphasis
        ));
    }
    for (class, members) in &groups {
        out.push_str(&format!("    class {} {}Style\n", members.join(","), class));
    }
}

/// Effective style class for a node type. Without boundary emphasis,
/// `start`/`end` style like the other stadium-shaped nodes.
fn style_class(node_type: Option<&str>, boundaries: bool) -> &'static str {
    match node_type {
        Some("input") => "input",
        Some("output") => "output",
        Some("decision") => "decision",
        Some("start") if boundaries => "start",
        Some("end") if boundaries => "end",
        Some("start") | Some("end") => "input",
        _ => "process",
    }
}

fn click_directive(node: &WorkflowNode, id: &str, protocol: ClickProtocol) -> String {
    let url = match protocol {
        ClickProtocol::Vscode => match node.line_number {
            Some(line) => format!("vscode://file/{}:{}", node.file_path, line),
            None => format!("vscode://file/{}", node.file_path),
        },
        ClickProtocol::Rstudio => match node.line_number {
            Some(line) => format!("rstudio://open?file={}&line={}", node.file_path, line),
            None => format!("rstudio://open?file={}", node.file_path),
        },
        ClickProtocol::File => format!("file://{}", node.file_path),
    };
    format!("    click {} \"{}\" \"Open {}\"\n", id, url, node.file_name)
}

/// Replaces characters Mermaid disallows in node identifiers and
/// prefixes ids that start with a digit.
pub fn sanitize_node_id(id: &str) -> String {
    let mut sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        sanitized = format!("node_{}", sanitized);
    }
    sanitized
}

/// Double-quotes a label, escaping embedded double quotes so they cannot
/// terminate the quoted region early.
pub fn quote_label(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "&quot;"))
}
