//! Comment extraction: raw leading trivia to a structured [`Comment`].

use tsz_common::comments::{get_comment_ranges, get_jsdoc_content, is_jsdoc_comment, last_jsdoc_comment};
use tsz_reflection::{Comment, CommentDisplayPart, CommentTag};

/// Tags that carry no content and only mark the declaration.
const MODIFIER_TAGS: &[&str] = &[
    "@abstract",
    "@alpha",
    "@beta",
    "@event",
    "@experimental",
    "@hidden",
    "@hideconstructor",
    "@ignore",
    "@internal",
    "@override",
    "@packageDocumentation",
    "@private",
    "@protected",
    "@public",
    "@readonly",
    "@sealed",
    "@virtual",
];

/// Block tags whose first word is a parameter name.
const NAMED_TAGS: &[&str] = &["@param", "@typeParam", "@template", "@prop", "@property"];

const INHERIT_DOC: &str = "@inheritDoc";

pub fn is_modifier_tag(tag: &str) -> bool {
    MODIFIER_TAGS.contains(&tag)
}

fn normalize_tag(tag: &str) -> String {
    if tag.eq_ignore_ascii_case(INHERIT_DOC) {
        INHERIT_DOC.to_string()
    } else {
        tag.to_string()
    }
}

/// Parse the JSDoc block documenting a declaration. `None` when the trivia
/// holds no JSDoc comment or the comment is empty.
pub fn extract(raw: &str) -> Option<Comment> {
    let text = last_jsdoc_comment(raw)?;
    let comment = parse_comment_body(&get_jsdoc_content(text));
    (!comment.is_empty()).then_some(comment)
}

/// Parse the module comment of a file: the first JSDoc block that carries
/// `@packageDocumentation` or `@module`.
pub fn extract_file_comment(raw: &str) -> Option<Comment> {
    get_comment_ranges(raw)
        .iter()
        .map(|range| range.get_text(raw))
        .filter(|text| is_jsdoc_comment(text))
        .map(|text| parse_comment_body(&get_jsdoc_content(text)))
        .find(|comment| {
            comment.has_modifier("@packageDocumentation") || comment.get_tag("@module").is_some()
        })
}

/// Parse comment content with delimiters and gutters already stripped.
pub fn parse_comment_body(content: &str) -> Comment {
    let mut comment = Comment::default();
    let mut sections: Vec<(Option<String>, String)> = Vec::new();
    let mut current: (Option<String>, String) = (None, String::new());
    let mut in_fence = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence && starts_block_tag(trimmed) {
            let (tag, rest) = split_first_word(trimmed);
            let tag = normalize_tag(tag);
            if is_modifier_tag(&tag) {
                comment.modifier_tags.insert(tag);
                if !rest.is_empty() {
                    push_line(&mut current.1, rest);
                }
                continue;
            }
            sections.push(std::mem::replace(
                &mut current,
                (Some(tag), rest.to_string()),
            ));
            continue;
        }
        push_line(&mut current.1, line);
    }
    sections.push(current);

    for (tag, text) in sections {
        match tag {
            None => comment.summary = parse_parts(text.trim()),
            Some(tag) => comment.block_tags.push(block_tag(tag, &text)),
        }
    }
    comment
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

fn starts_block_tag(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('@') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

fn block_tag(tag: String, text: &str) -> CommentTag {
    if tag == INHERIT_DOC {
        let (target, _) = split_first_word(text);
        let mut result = CommentTag::new(tag, Vec::new());
        if !target.is_empty() {
            result.name = Some(target.to_string());
        }
        return result;
    }
    if NAMED_TAGS.contains(&tag.as_str()) {
        let (name, rest) = split_param_name(text);
        let mut result = CommentTag::new(tag, parse_parts(rest.trim()));
        if !name.is_empty() {
            result.name = Some(name);
        }
        return result;
    }
    CommentTag::new(tag, parse_parts(text.trim()))
}

/// `{type} [name=default] - text` to (`name`, `text`).
fn split_param_name(text: &str) -> (String, &str) {
    let mut text = text.trim_start();
    if text.starts_with('{')
        && let Some(close) = text.find('}')
    {
        text = text[close + 1..].trim_start();
    }
    let (word, rest) = split_first_word(text);
    let name = word
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split('=')
        .next()
        .unwrap_or_default()
        .to_string();
    let rest = rest.strip_prefix('-').map_or(rest, str::trim_start);
    (name, rest)
}

/// Split comment text into text, code and inline tag parts.
pub fn parse_parts(text: &str) -> Vec<CommentDisplayPart> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if rest.starts_with("```") {
            let end = rest[3..].find("```").map_or(rest.len(), |i| i + 6);
            flush_text(&mut parts, &mut buf);
            parts.push(CommentDisplayPart::code(&rest[..end]));
            pos += end;
            continue;
        }
        if rest.starts_with('`')
            && let Some(close) = rest[1..].find('`')
        {
            flush_text(&mut parts, &mut buf);
            parts.push(CommentDisplayPart::code(&rest[..close + 2]));
            pos += close + 2;
            continue;
        }
        if rest.starts_with("{@")
            && let Some(close) = rest.find('}')
        {
            flush_text(&mut parts, &mut buf);
            parts.push(inline_tag(&rest[1..close]));
            pos += close + 1;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        buf.push(ch);
        pos += ch.len_utf8();
    }
    flush_text(&mut parts, &mut buf);
    parts
}

fn flush_text(parts: &mut Vec<CommentDisplayPart>, buf: &mut String) {
    if !buf.is_empty() {
        parts.push(CommentDisplayPart::text(std::mem::take(buf)));
    }
}

/// `@link Target | text` (without braces) to an inline tag part.
fn inline_tag(inner: &str) -> CommentDisplayPart {
    let (tag, rest) = split_first_word(inner);
    let tag = normalize_tag(tag);
    let rest = rest.trim();

    if tag == INHERIT_DOC {
        return CommentDisplayPart::InlineTag {
            tag,
            text: String::new(),
            target: (!rest.is_empty()).then(|| rest.to_string()),
        };
    }

    let (target, text) = match rest.split_once('|') {
        Some((target, text)) => (target.trim(), text.trim()),
        None => {
            let (target, text) = split_first_word(rest);
            (target, text.trim())
        }
    };
    let text = if text.is_empty() { target } else { text };
    CommentDisplayPart::InlineTag {
        tag,
        text: text.to_string(),
        target: (!target.is_empty()).then(|| target.to_string()),
    }
}

/// An `@inheritDoc` directive found in a comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InheritDocDirective {
    /// Dotted name of the comment source; `None` means "the member this one
    /// overrides or implements".
    pub target: Option<String>,
}

/// Remove any `@inheritDoc` directive from `comment` and return it.
///
/// Block form wins over inline form when both are present.
pub fn take_inherit_doc(comment: &mut Comment) -> Option<InheritDocDirective> {
    let mut directive = None;

    let mut index = 0;
    while index < comment.summary.len() {
        if let CommentDisplayPart::InlineTag { tag, target, .. } = &comment.summary[index]
            && tag == INHERIT_DOC
        {
            directive = Some(InheritDocDirective {
                target: target.clone(),
            });
            comment.summary.remove(index);
            continue;
        }
        index += 1;
    }

    if let Some(tag) = comment.take_tags(INHERIT_DOC).into_iter().next() {
        directive = Some(InheritDocDirective { target: tag.name });
    }
    directive
}

#[cfg(test)]
#[path = "tests/comments_tests.rs"]
mod tests;
