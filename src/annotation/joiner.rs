//! Assembles logical annotation lines from raw file lines.
//!
//! Handles backslash continuation for single-line comments and the
//! block-comment variant for `/* ... */` languages.

use crate::language::BlockCommentSyntax;

/// One logical annotation occurrence: the joined text and the 1-based
/// line where it begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    pub text: String,
    pub line_number: u32,
}

/// Scans raw file lines for PUT annotations, joining continuations.
///
/// Single-line style: a comment line whose body starts with `put` opens
/// an annotation; a trailing backslash continues it onto the next
/// comment line. Block style (when the language has one): each `put`
/// line inside an open block is an independent annotation. Results are
/// deduplicated by `(line_number, text)` so a line matched by both
/// styles is reported once.
pub fn collect_annotations(
    lines: &[&str],
    comment_prefix: &str,
    block: Option<BlockCommentSyntax>,
) -> Vec<RawAnnotation> {
    let mut found = Vec::new();

    collect_single_line(lines, comment_prefix, &mut found);
    if let Some(syntax) = block {
        collect_block(lines, syntax, &mut found);
    }

    found.sort_by_key(|a| a.line_number);
    found.dedup_by(|a, b| a.line_number == b.line_number && a.text == b.text);
    found
}

/// Whether a comment body (prefix already removed) starts a PUT marker.
fn is_put_marker(body: &str) -> bool {
    let body = body.trim_start();
    let body = body
        .strip_prefix('|')
        .or_else(|| body.strip_prefix(':'))
        .unwrap_or(body)
        .trim_start();
    match body.strip_prefix("put") {
        Some(rest) => match rest.chars().next() {
            None => true,
            Some(c) => c == '|' || c == ':' || c.is_whitespace(),
        },
        None => false,
    }
}

/// Strips the comment prefix and an optional `|`/`:` separator from a
/// continuation line, returning its content.
fn continuation_content<'a>(line: &'a str, comment_prefix: &str) -> &'a str {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix(comment_prefix).unwrap_or(trimmed);
    let rest = rest.trim_start();
    rest.strip_prefix('|')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest)
        .trim()
}

fn collect_single_line(lines: &[&str], comment_prefix: &str, found: &mut Vec<RawAnnotation>) {
    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim_start();
        let Some(body) = trimmed.strip_prefix(comment_prefix) else {
            i += 1;
            continue;
        };
        if !is_put_marker(body) {
            i += 1;
            continue;
        }

        let start_line = (i + 1) as u32;
        let mut text = trimmed.trim_end().to_string();
        while text.ends_with('\\') && i + 1 < lines.len() {
            text.truncate(text.len() - 1);
            let text_trimmed = text.trim_end().to_string();
            i += 1;
            let content = continuation_content(lines[i], comment_prefix);
            text = format!("{} {}", text_trimmed, content).trim_end().to_string();
        }

        found.push(RawAnnotation {
            text,
            line_number: start_line,
        });
        i += 1;
    }
}

/// Finds the byte offset of `needle` in `line`, ignoring occurrences
/// inside matched quote pairs.
fn find_outside_quotes(line: &str, needle: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                } else if line[i..].starts_with(needle) {
                    return Some(i);
                }
            }
        }
    }
    None
}

fn collect_block(lines: &[&str], syntax: BlockCommentSyntax, found: &mut Vec<RawAnnotation>) {
    let mut in_block = false;

    for (idx, line) in lines.iter().enumerate() {
        let mut content: &str = line;

        if !in_block {
            match find_outside_quotes(line, syntax.open) {
                Some(pos) => {
                    in_block = true;
                    content = &line[pos + syntax.open.len()..];
                }
                None => continue,
            }
        }

        let mut closed_here = false;
        if let Some(pos) = content.find(syntax.close) {
            closed_here = true;
            content = &content[..pos];
        }

        // Strip the conventional continuation prefix, then look for the
        // marker. Each block line is an independent annotation.
        let body = content.trim_start();
        let body = body.strip_prefix(syntax.line_prefix).unwrap_or(body);
        if is_put_marker(body) {
            found.push(RawAnnotation {
                text: body.trim().to_string(),
                line_number: (idx + 1) as u32,
            });
        }

        if closed_here {
            in_block = false;
        }
    }
}
