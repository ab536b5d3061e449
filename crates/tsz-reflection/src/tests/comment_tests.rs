use super::*;

fn tag(name: &str, text: &str) -> CommentTag {
    CommentTag::new(name, vec![CommentDisplayPart::text(text)])
}

#[test]
fn test_empty_comment() {
    assert!(Comment::default().is_empty());
    assert!(Comment::new(vec![CommentDisplayPart::text("  ")]).is_empty());
    assert!(!Comment::new(vec![CommentDisplayPart::text("x")]).is_empty());
}

#[test]
fn test_inline_tag_without_text_is_content() {
    let comment = Comment::new(vec![CommentDisplayPart::InlineTag {
        tag: "@inheritDoc".to_string(),
        text: String::new(),
        target: None,
    }]);
    assert!(!comment.is_empty());
}

#[test]
fn test_parts_to_text_renders_inline_tags() {
    let parts = vec![
        CommentDisplayPart::text("See "),
        CommentDisplayPart::InlineTag {
            tag: "@link".to_string(),
            text: "the base".to_string(),
            target: Some("Base".to_string()),
        },
        CommentDisplayPart::text(" and "),
        CommentDisplayPart::code("`x`"),
    ];
    assert_eq!(parts_to_text(&parts), "See {@link Base the base} and `x`");
}

#[test]
fn test_take_tags_keeps_others_in_order() {
    let mut comment = Comment::default();
    comment.block_tags = vec![
        tag("@param", "a").with_name("a"),
        tag("@returns", "r"),
        tag("@param", "b").with_name("b"),
    ];
    let params = comment.take_tags("@param");
    assert_eq!(params.len(), 2);
    assert_eq!(params[1].name.as_deref(), Some("b"));
    assert_eq!(comment.block_tags.len(), 1);
    assert_eq!(comment.block_tags[0].tag, "@returns");
}

#[test]
fn test_inherit_keeps_local_summary() {
    let mut local = Comment::new(vec![CommentDisplayPart::text("Local.")]);
    let source = Comment::new(vec![CommentDisplayPart::text("Source.")]);
    local.inherit_from(&source);
    assert_eq!(local.summary_text(), "Local.");
}

#[test]
fn test_inherit_fills_empty_summary_and_merges_tags() {
    let mut local = Comment::default();
    local.block_tags.push(tag("@returns", "local returns"));
    local.block_tags.push(tag("@param", "local x").with_name("x"));

    let mut source = Comment::new(vec![CommentDisplayPart::text("Source.")]);
    source.block_tags.push(tag("@returns", "source returns"));
    source.block_tags.push(tag("@param", "source x").with_name("x"));
    source.block_tags.push(tag("@param", "source y").with_name("y"));
    source.modifier_tags.insert("@beta".to_string());

    local.inherit_from(&source);

    assert_eq!(local.summary_text(), "Source.");
    assert_eq!(
        parts_to_text(&local.get_tag("@returns").unwrap().content),
        "local returns"
    );
    assert_eq!(
        parts_to_text(&local.get_named_tag("@param", "x").unwrap().content),
        "local x"
    );
    assert_eq!(
        parts_to_text(&local.get_named_tag("@param", "y").unwrap().content),
        "source y"
    );
    assert!(local.has_modifier("@beta"));
}

#[test]
fn test_comment_json_shape() {
    let mut comment = Comment::new(vec![CommentDisplayPart::text("Hi")]);
    comment.modifier_tags.insert("@internal".to_string());
    let value = serde_json::to_value(&comment).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "summary": [{ "kind": "text", "text": "Hi" }],
            "modifierTags": ["@internal"]
        })
    );
}
