//! Tokenizer for one logical PUT annotation line.

/// Parses a logical annotation line into ordered `key -> value` pairs.
///
/// Accepts the marker forms `put`, `put|`, and `put:`, optionally
/// preceded by whitespace and a single-line comment prefix (`#`, `//`,
/// `--`, `%`). Pairs take the shape `key:"value"` or `key:'value'`,
/// comma-separated; commas inside a quoted value never split the list.
/// Whitespace inside quotes is preserved verbatim; whitespace around
/// keys is trimmed. Pair order follows source order.
///
/// Returns `None` when the marker is absent, the body is empty, or no
/// fragment carries a quote-delimited value. Malformed fragments among
/// well-formed ones are skipped.
pub fn parse_annotation(line: &str) -> Option<Vec<(String, String)>> {
    let body = strip_marker(line)?;
    if body.is_empty() {
        return None;
    }

    let mut pairs = Vec::new();
    for fragment in split_outside_quotes(body) {
        if let Some(pair) = parse_pair(&fragment) {
            pairs.push(pair);
        }
    }

    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

/// Strips an optional comment prefix and the `put` marker, returning the
/// pair-list body. `None` when the line is not an annotation.
fn strip_marker(line: &str) -> Option<&str> {
    let mut rest = line.trim_start();
    for prefix in ["#", "//", "--", "%"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start();
            break;
        }
    }
    // Separator variants placed between the prefix and the marker.
    rest = rest
        .strip_prefix('|')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest)
        .trim_start();

    let rest = rest.strip_prefix("put")?;
    match rest.chars().next() {
        Some('|') | Some(':') => Some(rest[1..].trim()),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        _ => None,
    }
}

/// Splits on commas that sit outside quoted regions.
fn split_outside_quotes(body: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in body.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    fragments.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            },
        }
    }
    if !current.trim().is_empty() {
        fragments.push(current);
    }
    fragments
}

/// Parses one `key:"value"` fragment. `None` when the value is not
/// quote-delimited.
fn parse_pair(fragment: &str) -> Option<(String, String)> {
    let colon = fragment.find(':')?;
    let key = fragment[..colon].trim();
    if key.is_empty() {
        return None;
    }
    let value_part = fragment[colon + 1..].trim();
    let quote = value_part.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = &value_part[1..];
    let end = inner.find(quote)?;
    Some((key.to_string(), inner[..end].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_pairs() {
        let pairs = parse_annotation(r#"#put id:"load", label:"Load data""#).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "load".to_string()),
                ("label".to_string(), "Load data".to_string()),
            ]
        );
    }

    #[test]
    fn commas_inside_quotes_do_not_split() {
        let pairs = parse_annotation(r#"#put id:"a", label:"b, c, d""#).unwrap();
        assert_eq!(pairs[1], ("label".to_string(), "b, c, d".to_string()));
    }

    #[test]
    fn accepts_pipe_and_colon_markers() {
        assert!(parse_annotation(r#"#put| id:"a""#).is_some());
        assert!(parse_annotation(r#"#put: id:"a""#).is_some());
        assert!(parse_annotation(r#"put id:"a""#).is_some());
    }

    #[test]
    fn accepts_every_comment_prefix() {
        assert!(parse_annotation(r#"// put id:"a""#).is_some());
        assert!(parse_annotation(r#"-- put id:"a""#).is_some());
        assert!(parse_annotation(r#"% put id:"a""#).is_some());
    }

    #[test]
    fn single_quotes_work_per_pair() {
        let pairs = parse_annotation(r#"#put id:'a', label:"it's fine""#).unwrap();
        assert_eq!(pairs[0].1, "a");
        assert_eq!(pairs[1].1, "it's fine");
    }

    #[test]
    fn preserves_whitespace_inside_quotes() {
        let pairs = parse_annotation(r#"#put label:"  padded  ""#).unwrap();
        assert_eq!(pairs[0].1, "  padded  ");
    }

    #[test]
    fn rejects_non_annotations() {
        assert!(parse_annotation("# plain comment").is_none());
        assert!(parse_annotation("#put").is_none());
        assert!(parse_annotation("#put   ").is_none());
        assert!(parse_annotation("#put id:unquoted").is_none());
        assert!(parse_annotation("x <- input").is_none());
        // `putting` must not trigger the marker
        assert!(parse_annotation(r#"#putting id:"a""#).is_none());
    }

    #[test]
    fn skips_malformed_fragment_among_valid_pairs() {
        let pairs = parse_annotation(r#"#put id:"a", junk, label:"b""#).unwrap();
        assert_eq!(pairs.len(), 2);
    }
}
