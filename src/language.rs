//! Language registry: maps file extensions and special filenames to a
//! comment-prefix family and a canonical language name.
//!
//! Kept as flat static tables so that supporting a new language is a
//! pure data change.

/// Comment syntax information resolved for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Canonical language name, `None` when the extension is unknown.
    pub language: Option<&'static str>,
    /// The extension or special filename the lookup matched on.
    pub key: String,
    /// Single-line comment prefix for this file.
    pub comment_prefix: &'static str,
}

/// Block comment delimiters for languages that support them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCommentSyntax {
    pub open: &'static str,
    pub close: &'static str,
    /// Conventional prefix of continuation lines inside a block.
    pub line_prefix: &'static str,
}

/// Special filenames that carry no extension but a known language.
const FILENAME_TABLE: &[(&str, &str, &str)] = &[
    ("Dockerfile", "dockerfile", "#"),
    ("Makefile", "makefile", "#"),
    ("makefile", "makefile", "#"),
    ("GNUmakefile", "makefile", "#"),
];

/// Extension table: `(extension, language, comment_prefix)`.
const EXTENSION_TABLE: &[(&str, &str, &str)] = &[
    // hash family
    ("r", "r", "#"),
    ("py", "python", "#"),
    ("sh", "shell", "#"),
    ("bash", "shell", "#"),
    ("zsh", "shell", "#"),
    ("jl", "julia", "#"),
    ("rb", "ruby", "#"),
    ("yaml", "yaml", "#"),
    ("yml", "yaml", "#"),
    ("toml", "toml", "#"),
    ("pl", "perl", "#"),
    ("mk", "makefile", "#"),
    ("dockerfile", "dockerfile", "#"),
    // dash family
    ("sql", "sql", "--"),
    ("lua", "lua", "--"),
    ("hs", "haskell", "--"),
    // slash family
    ("js", "javascript", "//"),
    ("jsx", "javascript", "//"),
    ("mjs", "javascript", "//"),
    ("ts", "typescript", "//"),
    ("tsx", "typescript", "//"),
    ("c", "c", "//"),
    ("h", "c", "//"),
    ("cpp", "cpp", "//"),
    ("cc", "cpp", "//"),
    ("cxx", "cpp", "//"),
    ("hpp", "cpp", "//"),
    ("hh", "cpp", "//"),
    ("java", "java", "//"),
    ("go", "go", "//"),
    ("rs", "rust", "//"),
    ("swift", "swift", "//"),
    ("kt", "kotlin", "//"),
    ("kts", "kotlin", "//"),
    ("cs", "csharp", "//"),
    ("php", "php", "//"),
    ("scala", "scala", "//"),
    ("wgsl", "wgsl", "//"),
    // percent family
    ("m", "matlab", "%"),
    ("tex", "latex", "%"),
];

/// Languages using `//` line comments; these also support `/* ... */` blocks.
const SLASH_FAMILY: &[&str] = &[
    "javascript",
    "typescript",
    "c",
    "cpp",
    "java",
    "go",
    "rust",
    "swift",
    "kotlin",
    "csharp",
    "php",
    "scala",
    "wgsl",
];

/// The languages the detection pattern library has entries for.
pub const DETECTION_LANGUAGES: &[&str] = &[
    "r",
    "python",
    "sql",
    "shell",
    "julia",
    "javascript",
    "typescript",
    "go",
    "rust",
    "java",
    "c",
    "cpp",
    "matlab",
    "ruby",
    "lua",
    "wgsl",
];

/// Resolves comment syntax for a file name.
///
/// Resolution order: exact filename match (e.g. `Dockerfile`), then the
/// lowercased extension. Unknown extensions fall back to the `#` prefix
/// with no canonical language, so annotation parsing still works while
/// auto-detection is skipped.
pub fn resolve_language(file_name: &str) -> LanguageInfo {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    for (name, language, prefix) in FILENAME_TABLE {
        if base == *name {
            return LanguageInfo {
                language: Some(language),
                key: (*name).to_string(),
                comment_prefix: prefix,
            };
        }
    }

    let ext = base.rsplit('.').next().unwrap_or("").to_lowercase();
    if ext != base.to_lowercase() {
        for (e, language, prefix) in EXTENSION_TABLE {
            if ext == *e {
                return LanguageInfo {
                    language: Some(language),
                    key: ext,
                    comment_prefix: prefix,
                };
            }
        }
    }

    LanguageInfo {
        language: None,
        key: ext,
        comment_prefix: "#",
    }
}

/// Returns block comment syntax for a language, when it has one.
///
/// Only the `//` family carries `/* ... */` blocks; every other family
/// returns `None`.
pub fn block_comment_syntax(language: &str) -> Option<BlockCommentSyntax> {
    if SLASH_FAMILY.contains(&language) {
        Some(BlockCommentSyntax {
            open: "/*",
            close: "*/",
            line_prefix: "*",
        })
    } else {
        None
    }
}

/// All extensions the registry knows about.
pub fn known_extensions() -> Vec<&'static str> {
    EXTENSION_TABLE.iter().map(|(e, _, _)| *e).collect()
}

/// All canonical language names, deduplicated, in table order.
///
/// With `detection_only`, restricts to the languages the detection
/// pattern library covers.
pub fn known_languages(detection_only: bool) -> Vec<&'static str> {
    if detection_only {
        return DETECTION_LANGUAGES.to_vec();
    }
    let mut seen = Vec::new();
    for (_, language, _) in EXTENSION_TABLE {
        if !seen.contains(language) {
            seen.push(language);
        }
    }
    for (_, language, _) in FILENAME_TABLE {
        if !seen.contains(language) {
            seen.push(language);
        }
    }
    seen
}

/// Whether a bare name is a known extensionless file reference
/// (`Dockerfile`, `Makefile`, ...). Used by the validator to avoid
/// flagging these as missing an extension.
pub fn is_extensionless_known(name: &str) -> bool {
    FILENAME_TABLE.iter().any(|(n, _, _)| *n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_extension() {
        let info = resolve_language("analysis.R");
        assert_eq!(info.language, Some("r"));
        assert_eq!(info.comment_prefix, "#");

        let info = resolve_language("src/main.rs");
        assert_eq!(info.language, Some("rust"));
        assert_eq!(info.comment_prefix, "//");

        let info = resolve_language("query.sql");
        assert_eq!(info.comment_prefix, "--");

        let info = resolve_language("plot.m");
        assert_eq!(info.comment_prefix, "%");
    }

    #[test]
    fn resolves_special_filenames() {
        let info = resolve_language("Dockerfile");
        assert_eq!(info.language, Some("dockerfile"));
        let info = resolve_language("deploy/Makefile");
        assert_eq!(info.language, Some("makefile"));
        assert_eq!(info.comment_prefix, "#");
    }

    #[test]
    fn unknown_extension_falls_back_to_hash() {
        let info = resolve_language("notes.xyz");
        assert_eq!(info.language, None);
        assert_eq!(info.comment_prefix, "#");
    }

    #[test]
    fn block_comments_only_for_slash_family() {
        assert!(block_comment_syntax("rust").is_some());
        assert!(block_comment_syntax("c").is_some());
        assert!(block_comment_syntax("python").is_none());
        assert!(block_comment_syntax("sql").is_none());
    }

    #[test]
    fn sixteen_detection_languages() {
        assert_eq!(known_languages(true).len(), 16);
    }
}
