use super::*;

#[test]
fn test_get_comment_ranges_finds_both_styles() {
    let source = "// line\n/* block */\n/** doc */\n";
    let ranges = get_comment_ranges(source);
    assert_eq!(ranges.len(), 3);
    assert!(!ranges[0].is_multi_line);
    assert_eq!(ranges[1].get_text(source), "/* block */");
    assert_eq!(ranges[2].get_text(source), "/** doc */");
}

#[test]
fn test_unclosed_block_runs_to_end() {
    let source = "/** never closed";
    let ranges = get_comment_ranges(source);
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].end as usize, source.len());
}

#[test]
fn test_is_jsdoc_comment() {
    assert!(is_jsdoc_comment("/** doc */"));
    assert!(!is_jsdoc_comment("/*** banner */"));
    assert!(!is_jsdoc_comment("/* plain */"));
    assert!(!is_jsdoc_comment("/**/"));
}

#[test]
fn test_last_jsdoc_comment_picks_the_closest_block() {
    let source = "/** license */\n// note\n/** The real docs */\n";
    assert_eq!(last_jsdoc_comment(source), Some("/** The real docs */"));
    assert_eq!(last_jsdoc_comment("// only a line comment"), None);
}

#[test]
fn test_get_jsdoc_content_strips_gutter() {
    let text = "/**\n * Summary line.\n *\n * @param x the value\n */";
    assert_eq!(get_jsdoc_content(text), "Summary line.\n\n@param x the value");
}

#[test]
fn test_get_jsdoc_content_single_line() {
    assert_eq!(get_jsdoc_content("/** Just this. */"), "Just this.");
}

#[test]
fn test_get_jsdoc_content_keeps_code_indentation() {
    let text = "/**\n * ```ts\n * if (x) {\n *     run();\n * }\n * ```\n */";
    let content = get_jsdoc_content(text);
    assert!(content.contains("\n    run();\n"), "got: {content:?}");
}
