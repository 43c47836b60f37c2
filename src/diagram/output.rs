//! Output sinks for rendered diagrams.
//!
//! All modes share one generation path; only the final destination
//! differs. The clipboard sink is best-effort and falls back to the
//! console when no clipboard utility is available.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::warn;

use crate::errors::Result;

/// Where rendered Mermaid text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Return the raw text only.
    Text,
    /// Print a fenced ```mermaid code block to stdout.
    Console,
    /// Write the raw text to a file.
    File(PathBuf),
    /// Copy to the system clipboard, falling back to the console.
    Clipboard,
}

/// Wraps Mermaid text in a fenced code block.
pub fn fenced(mermaid: &str) -> String {
    format!("```mermaid\n{}```\n", mermaid)
}

/// Sends rendered text to the chosen sink. Returns the raw text in
/// every mode so callers can chain on it.
pub fn emit(mermaid: &str, mode: &OutputMode) -> Result<String> {
    match mode {
        OutputMode::Text => {}
        OutputMode::Console => print!("{}", fenced(mermaid)),
        OutputMode::File(path) => {
            std::fs::write(path, mermaid)?;
        }
        OutputMode::Clipboard => {
            if !copy_to_clipboard(mermaid) {
                warn!("no clipboard utility available, printing to console instead");
                print!("{}", fenced(mermaid));
            }
        }
    }
    Ok(mermaid.to_string())
}

/// Tries the common clipboard utilities in order. Returns whether any
/// of them accepted the text.
fn copy_to_clipboard(text: &str) -> bool {
    let candidates: &[(&str, &[&str])] = &[
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("clip", &[]),
    ];
    for (program, args) in candidates {
        let spawned = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = spawned else {
            continue;
        };
        // Take the handle so it drops (closing the pipe) before wait.
        if let Some(mut stdin) = child.stdin.take() {
            if stdin.write_all(text.as_bytes()).is_err() {
                continue;
            }
        }
        if matches!(child.wait(), Ok(status) if status.success()) {
            return true;
        }
    }
    false
}
