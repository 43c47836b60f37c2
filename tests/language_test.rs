use putgraph::language::{
    block_comment_syntax, known_extensions, known_languages, resolve_language,
    DETECTION_LANGUAGES,
};

#[test]
fn test_comment_prefix_families() {
    for (file, prefix) in [
        ("analysis.R", "#"),
        ("pipeline.py", "#"),
        ("run.sh", "#"),
        ("solver.jl", "#"),
        ("query.sql", "--"),
        ("mod.lua", "--"),
        ("app.js", "//"),
        ("app.ts", "//"),
        ("main.go", "//"),
        ("lib.rs", "//"),
        ("Main.java", "//"),
        ("shader.wgsl", "//"),
        ("plot.m", "%"),
        ("paper.tex", "%"),
    ] {
        assert_eq!(
            resolve_language(file).comment_prefix,
            prefix,
            "wrong prefix for {}",
            file
        );
    }
}

#[test]
fn test_extension_lookup_is_case_insensitive() {
    assert_eq!(resolve_language("a.R").language, Some("r"));
    assert_eq!(resolve_language("a.r").language, Some("r"));
    assert_eq!(resolve_language("A.PY").language, Some("python"));
}

#[test]
fn test_special_filenames_beat_extensions() {
    assert_eq!(resolve_language("Dockerfile").language, Some("dockerfile"));
    assert_eq!(resolve_language("Makefile").language, Some("makefile"));
    assert_eq!(resolve_language("GNUmakefile").language, Some("makefile"));
    // lookup works with a leading directory too
    assert_eq!(resolve_language("build/Makefile").language, Some("makefile"));
}

#[test]
fn test_unknown_extension_falls_back_to_hash() {
    let info = resolve_language("notes.xyz");
    assert_eq!(info.language, None);
    assert_eq!(info.comment_prefix, "#");
}

#[test]
fn test_block_comments_only_in_slash_family() {
    assert!(block_comment_syntax("c").is_some());
    assert!(block_comment_syntax("rust").is_some());
    assert!(block_comment_syntax("typescript").is_some());
    assert!(block_comment_syntax("r").is_none());
    assert!(block_comment_syntax("sql").is_none());
    assert!(block_comment_syntax("matlab").is_none());
}

#[test]
fn test_detection_languages_are_a_subset_of_known() {
    let all = known_languages(false);
    for lang in DETECTION_LANGUAGES {
        assert!(all.contains(lang), "{} not in the registry", lang);
    }
    assert_eq!(known_languages(true).len(), DETECTION_LANGUAGES.len());
}

#[test]
fn test_every_extension_resolves() {
    for ext in known_extensions() {
        let info = resolve_language(&format!("file.{}", ext));
        assert!(info.language.is_some(), "extension {} has no language", ext);
    }
}
