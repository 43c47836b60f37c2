use putgraph::annotation::{collect_annotations, parse_annotation};

/// Serializes pairs back into annotation syntax.
fn to_annotation(pairs: &[(String, String)]) -> String {
    let body: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}:\"{}\"", k, v))
        .collect();
    format!("#put {}", body.join(", "))
}

#[test]
fn test_round_trip_three_pairs() {
    let original = r#"#put id:"load", label:"Load data", output:"data.csv""#;
    let pairs = parse_annotation(original).unwrap();
    let reparsed = parse_annotation(&to_annotation(&pairs)).unwrap();
    assert_eq!(pairs, reparsed);
}

#[test]
fn test_round_trip_five_pairs() {
    let original = r#"#put id:"x", label:"a, b", node_type:"process", input:"in.csv", owner:"team""#;
    let pairs = parse_annotation(original).unwrap();
    assert_eq!(pairs.len(), 5);
    let reparsed = parse_annotation(&to_annotation(&pairs)).unwrap();
    assert_eq!(pairs, reparsed);
}

#[test]
fn test_comma_safety() {
    let pairs = parse_annotation(r#"#put id:"a", label:"b, c, d""#).unwrap();
    assert_eq!(
        pairs,
        vec![
            ("id".to_string(), "a".to_string()),
            ("label".to_string(), "b, c, d".to_string()),
        ]
    );
}

#[test]
fn test_source_order_preserved() {
    let pairs = parse_annotation(r#"#put zeta:"1", alpha:"2", mid:"3""#).unwrap();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_values_stay_strings() {
    let pairs = parse_annotation(r#"#put id:"42", flag:"true""#).unwrap();
    assert_eq!(pairs[0].1, "42");
    assert_eq!(pairs[1].1, "true");
}

#[test]
fn test_multiline_equivalence_three_pairs() {
    let single = vec![r#"#put id:"a", label:"b", output:"c.csv""#];
    let multi = vec![
        r#"#put id:"a", \"#,
        r#"# label:"b", \"#,
        r#"# output:"c.csv""#,
    ];
    let joined_single = collect_annotations(&single, "#", None);
    let joined_multi = collect_annotations(&multi, "#", None);
    assert_eq!(
        parse_annotation(&joined_single[0].text),
        parse_annotation(&joined_multi[0].text)
    );
}

#[test]
fn test_multiline_equivalence_five_pairs() {
    let single =
        vec![r#"#put id:"x", label:"y", node_type:"process", input:"a.csv", output:"b.csv""#];
    let multi = vec![
        r#"#put id:"x", label:"y", \"#,
        r#"# node_type:"process", \"#,
        r#"# input:"a.csv", \"#,
        r#"# output:"b.csv""#,
    ];
    let joined_single = collect_annotations(&single, "#", None);
    let joined_multi = collect_annotations(&multi, "#", None);
    assert_eq!(joined_multi[0].line_number, 1);
    assert_eq!(
        parse_annotation(&joined_single[0].text),
        parse_annotation(&joined_multi[0].text)
    );
}

#[test]
fn test_dash_prefix_annotations() {
    let lines = vec!["SELECT 1;", r#"--put id:"q", output:"rows.csv""#];
    let found = collect_annotations(&lines, "--", None);
    assert_eq!(found.len(), 1);
    let pairs = parse_annotation(&found[0].text).unwrap();
    assert_eq!(pairs[0], ("id".to_string(), "q".to_string()));
}
