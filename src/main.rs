use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use putgraph::diagram::output::{emit, OutputMode};
use putgraph::diagram::{render, ClickProtocol, DiagramOptions, Direction, SourceInfo};
use putgraph::errors::Result;
use putgraph::merge::{MergeOptions, MergeStrategy};
use putgraph::options::{AutoOptions, ScanOptions};
use putgraph::patterns::{lookup, PatternCategory};
use putgraph::workflow::Workflow;
use putgraph::{auto_detect, extract, merge};

/// Workflow graphs from PUT annotations in source code.
#[derive(Parser)]
#[command(name = "putgraph", about = "Scan PUT annotations and render workflow diagrams")]
struct Cli {
    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ScanArgs {
    /// File or directory to scan (default: current directory)
    path: Option<String>,
    /// Recurse into subdirectories
    #[arg(short, long)]
    recursive: bool,
    /// Regex applied to file names
    #[arg(short, long)]
    include: Option<String>,
    /// Exclude fragments (regex, repeatable or comma-joined)
    #[arg(short, long)]
    exclude: Vec<String>,
    /// Record annotation line numbers
    #[arg(short = 'n', long)]
    line_numbers: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan source files for PUT annotations
    Scan {
        #[command(flatten)]
        args: ScanArgs,
        /// Skip annotation validation
        #[arg(long)]
        no_validate: bool,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Auto-detect inputs and outputs from unannotated code
    Auto {
        #[command(flatten)]
        args: ScanArgs,
        /// Skip input pattern detection
        #[arg(long)]
        no_inputs: bool,
        /// Skip output pattern detection
        #[arg(long)]
        no_outputs: bool,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Merge manual annotations with auto-detected results
    Merge {
        #[command(flatten)]
        args: ScanArgs,
        /// Merge strategy
        #[arg(short, long, value_enum, default_value = "supplement")]
        strategy: MergeStrategy,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Render the workflow as a Mermaid flowchart
    Diagram {
        #[command(flatten)]
        args: ScanArgs,
        /// Build the workflow from auto-detection instead of annotations
        #[arg(long)]
        auto: bool,
        /// Merge annotations with auto-detection under a strategy
        #[arg(long, value_enum)]
        merge: Option<MergeStrategy>,
        /// Flowchart direction
        #[arg(short, long, value_enum, default_value = "TD")]
        direction: Direction,
        /// Named theme
        #[arg(short, long, default_value = "light")]
        theme: String,
        /// Diagram title
        #[arg(long)]
        title: Option<String>,
        /// Plain node ids instead of labels
        #[arg(long)]
        no_labels: bool,
        /// Label edges with the shared file name
        #[arg(long)]
        edge_files: bool,
        /// No classDef styling
        #[arg(long)]
        no_style: bool,
        /// Emphasize start/end workflow boundaries
        #[arg(short, long)]
        boundaries: bool,
        /// Render shared files as artifact nodes
        #[arg(short, long)]
        artifacts: bool,
        /// Originating-file rendering
        #[arg(long, value_enum, default_value = "off")]
        source_info: SourceInfo,
        /// Emit click directives
        #[arg(long)]
        clicks: bool,
        /// Click protocol
        #[arg(long, value_enum, default_value = "file")]
        protocol: ClickProtocol,
        /// Write the diagram to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Copy the diagram to the clipboard
        #[arg(long)]
        clipboard: bool,
    },
    /// List supported languages
    Languages {
        /// Only languages with detection pattern entries
        #[arg(short, long)]
        detection_only: bool,
        /// List recognized file extensions instead
        #[arg(short = 'x', long)]
        extensions: bool,
    },
    /// Show detection patterns for a language
    Patterns {
        /// Language name (e.g. r, python, rust)
        language: String,
        /// Restrict to one category (input, output, dependency)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Start the MCP server on stdio
    Serve {},
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn scan_options(args: &ScanArgs, validate: bool) -> ScanOptions {
    let mut options = ScanOptions {
        recursive: args.recursive,
        exclude: args.exclude.clone(),
        validate,
        include_line_numbers: args.line_numbers,
        ..ScanOptions::default()
    };
    if let Some(include) = &args.include {
        options.include_pattern = include.clone();
    }
    options
}

fn auto_options(args: &ScanArgs, detect_inputs: bool, detect_outputs: bool) -> AutoOptions {
    let mut options = AutoOptions {
        recursive: args.recursive,
        exclude: args.exclude.clone(),
        detect_inputs,
        detect_outputs,
        include_line_numbers: args.line_numbers,
        ..AutoOptions::default()
    };
    if let Some(include) = &args.include {
        options.include_pattern = include.clone();
    }
    options
}

fn resolve_path(path: &Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn print_workflow(workflow: &Workflow, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&workflow)?);
        return Ok(());
    }
    println!("{}", workflow.summary());
    if !workflow.is_empty() {
        let columns = workflow.columns();
        println!("{}", columns.join("\t"));
        for row in workflow.to_rows() {
            println!("{}", row.join("\t"));
        }
    }
    for warning in &workflow.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            args,
            no_validate,
            json,
        } => {
            let workflow = extract(&resolve_path(&args.path), &scan_options(&args, !no_validate))?;
            print_workflow(&workflow, json)?;
        }
        Commands::Auto {
            args,
            no_inputs,
            no_outputs,
            json,
        } => {
            let workflow = auto_detect(
                &resolve_path(&args.path),
                &auto_options(&args, !no_inputs, !no_outputs),
            )?;
            print_workflow(&workflow, json)?;
        }
        Commands::Merge {
            args,
            strategy,
            json,
        } => {
            let options = MergeOptions {
                scan: scan_options(&args, true),
                auto: auto_options(&args, true, true),
                strategy,
            };
            let workflow = merge(&resolve_path(&args.path), &options)?;
            print_workflow(&workflow, json)?;
        }
        Commands::Diagram {
            args,
            auto,
            merge: merge_strategy,
            direction,
            theme,
            title,
            no_labels,
            edge_files,
            no_style,
            boundaries,
            artifacts,
            source_info,
            clicks,
            protocol,
            output,
            clipboard,
        } => {
            let path = resolve_path(&args.path);
            let workflow = if let Some(strategy) = merge_strategy {
                let options = MergeOptions {
                    scan: scan_options(&args, false),
                    auto: auto_options(&args, true, true),
                    strategy,
                };
                merge(&path, &options)?
            } else if auto {
                auto_detect(&path, &auto_options(&args, true, true))?
            } else {
                extract(&path, &scan_options(&args, false))?
            };

            let options = DiagramOptions {
                direction,
                node_labels: !no_labels,
                show_files: edge_files,
                style_nodes: !no_style,
                theme,
                palette: None,
                title,
                show_workflow_boundaries: boundaries,
                show_artifacts: artifacts,
                show_source_info: source_info,
                enable_clicks: clicks,
                click_protocol: protocol,
            };
            let mermaid = render(&workflow, &options)?;

            let mode = if let Some(path) = output {
                OutputMode::File(path)
            } else if clipboard {
                OutputMode::Clipboard
            } else {
                OutputMode::Console
            };
            emit(&mermaid, &mode)?;
        }
        Commands::Languages {
            detection_only,
            extensions,
        } => {
            if extensions {
                for ext in putgraph::language::known_extensions() {
                    println!(".{}", ext);
                }
            } else {
                for language in putgraph::language::known_languages(detection_only) {
                    let marker = if putgraph::patterns::has_patterns(language) {
                        ""
                    } else {
                        " (no detection patterns)"
                    };
                    println!("{}{}", language, marker);
                }
            }
        }
        Commands::Patterns { language, category } => {
            let category = category
                .as_deref()
                .map(str::parse::<PatternCategory>)
                .transpose()?;
            let entries = lookup(&language, category)?;
            let mut categories: Vec<_> = entries.iter().collect();
            categories.sort_by(|a, b| a.0.cmp(b.0));
            for (name, patterns) in categories {
                println!("{}:", name);
                for p in patterns {
                    println!("  {:<24} {:<32} {}", p.func, p.regex, p.description);
                }
            }
        }
        Commands::Serve {} => {
            let server = putgraph::mcp::McpServer::new();
            server.run().await?;
        }
    }
    Ok(())
}
