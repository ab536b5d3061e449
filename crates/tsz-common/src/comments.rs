//! JSDoc comment text utilities.
//!
//! The front end hands the converter the raw leading trivia of a declaration.
//! These helpers locate comment ranges inside that text, pick the JSDoc block
//! that documents the declaration, and strip the `/** */` delimiters and the
//! leading `*` gutter so the comment lexer only sees content.

use serde::{Deserialize, Serialize};

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }
}

/// Extract all comment ranges from trivia text.
///
/// Scans for single-line (`//`) and multi-line (`/* */`) comments. Any other
/// character is skipped, so the input is expected to be trivia rather than code.
pub fn get_comment_ranges(source: &str) -> Vec<CommentRange> {
    let mut comments = Vec::new();
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        let ch = bytes[pos];

        if ch == b'/' && pos + 1 < len {
            let next = bytes[pos + 1];

            if next == b'/' {
                let start = pos as u32;
                pos += 2;
                while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                comments.push(CommentRange::new(start, pos as u32, false));
                continue;
            } else if next == b'*' {
                let start = pos as u32;
                pos += 2;

                let mut closed = false;
                while pos + 1 < len {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    pos = len; // Unclosed comment - go to end
                }

                comments.push(CommentRange::new(start, pos as u32, true));
                continue;
            }
        }

        pos += 1;
    }

    comments
}

/// Check if comment text is a JSDoc comment (`/**` but not `/***`).
pub fn is_jsdoc_comment(text: &str) -> bool {
    text.starts_with("/**") && !text.starts_with("/***") && text != "/**/"
}

/// The JSDoc block that documents a declaration: the last one in its trivia.
pub fn last_jsdoc_comment(source: &str) -> Option<&str> {
    get_comment_ranges(source)
        .iter()
        .rev()
        .map(|range| range.get_text(source))
        .find(|text| is_jsdoc_comment(text))
}

/// Extract the content of a JSDoc comment (without the delimiters).
///
/// Leading `*` gutters are removed. Indentation after the gutter is kept for
/// lines inside fenced code blocks so examples keep their shape; other lines
/// are trimmed on the left.
pub fn get_jsdoc_content(text: &str) -> String {
    let inner = if text.starts_with("/**") && text.ends_with("*/") && text.len() >= 5 {
        &text[3..text.len() - 2]
    } else if let Some(rest) = text.strip_prefix("/**") {
        rest
    } else {
        text
    };

    let mut in_fence = false;
    let mut lines = Vec::new();
    for line in inner.lines() {
        let trimmed = line.trim_start();
        let content = match trimmed.strip_prefix('*') {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => trimmed,
        };
        let content = if in_fence {
            content.trim_end()
        } else {
            content.trim()
        };
        if content.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        lines.push(content);
    }

    // Drop blank lines at either end.
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "tests/comments_tests.rs"]
mod tests;
