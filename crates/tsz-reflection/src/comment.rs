//! Parsed documentation comments.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One piece of comment text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommentDisplayPart {
    Text {
        text: String,
    },
    /// Inline code span or fenced code block, delimiters included.
    Code {
        text: String,
    },
    /// `{@link Target text}` and friends. `target` is the unresolved target
    /// name as written.
    InlineTag {
        tag: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl CommentDisplayPart {
    pub fn text(text: impl Into<String>) -> Self {
        CommentDisplayPart::Text { text: text.into() }
    }

    pub fn code(text: impl Into<String>) -> Self {
        CommentDisplayPart::Code { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            CommentDisplayPart::Text { text }
            | CommentDisplayPart::Code { text }
            | CommentDisplayPart::InlineTag { text, .. } => text,
        }
    }
}

/// Concatenate display parts into plain text.
pub fn parts_to_text(parts: &[CommentDisplayPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            CommentDisplayPart::InlineTag { tag, text, target } => {
                out.push('{');
                out.push_str(tag);
                if let Some(target) = target {
                    out.push(' ');
                    out.push_str(target);
                }
                if !text.is_empty() && target.as_deref() != Some(text.as_str()) {
                    out.push(' ');
                    out.push_str(text);
                }
                out.push('}');
            }
            other => out.push_str(other.as_text()),
        }
    }
    out
}

/// A block tag such as `@returns` or `@param name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTag {
    /// Tag including the `@`.
    pub tag: String,
    /// Parameter name for `@param`/`@typeParam`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Vec<CommentDisplayPart>,
}

impl CommentTag {
    pub fn new(tag: impl Into<String>, content: Vec<CommentDisplayPart>) -> Self {
        CommentTag {
            tag: tag.into(),
            name: None,
            content,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn same_slot(&self, other: &CommentTag) -> bool {
        self.tag == other.tag && self.name == other.name
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub summary: Vec<CommentDisplayPart>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_tags: Vec<CommentTag>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub modifier_tags: IndexSet<String>,
}

impl Comment {
    pub fn new(summary: Vec<CommentDisplayPart>) -> Self {
        Comment {
            summary,
            ..Comment::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !has_content(&self.summary) && self.block_tags.is_empty() && self.modifier_tags.is_empty()
    }

    pub fn has_modifier(&self, tag: &str) -> bool {
        self.modifier_tags.contains(tag)
    }

    pub fn get_tag(&self, tag: &str) -> Option<&CommentTag> {
        self.block_tags.iter().find(|t| t.tag == tag)
    }

    pub fn get_named_tag(&self, tag: &str, name: &str) -> Option<&CommentTag> {
        self.block_tags
            .iter()
            .find(|t| t.tag == tag && t.name.as_deref() == Some(name))
    }

    /// Remove every block tag named `tag` and return them in order.
    pub fn take_tags(&mut self, tag: &str) -> Vec<CommentTag> {
        let (taken, kept) = std::mem::take(&mut self.block_tags)
            .into_iter()
            .partition(|t| t.tag == tag);
        self.block_tags = kept;
        taken
    }

    pub fn summary_text(&self) -> String {
        parts_to_text(&self.summary)
    }

    /// Fill this comment from `source` (comment inheritance).
    ///
    /// The local summary wins unless it is empty. Block tags are merged per
    /// tag and name with local tags winning; modifier tags are united.
    pub fn inherit_from(&mut self, source: &Comment) {
        if !has_content(&self.summary) {
            self.summary = source.summary.clone();
        }
        for tag in &source.block_tags {
            if !self.block_tags.iter().any(|t| t.same_slot(tag)) {
                self.block_tags.push(tag.clone());
            }
        }
        for modifier in &source.modifier_tags {
            self.modifier_tags.insert(modifier.clone());
        }
    }
}

/// Inline tags count as content even when their text is empty
/// (`{@inheritDoc}`).
fn has_content(parts: &[CommentDisplayPart]) -> bool {
    parts.iter().any(|p| {
        matches!(p, CommentDisplayPart::InlineTag { .. }) || !p.as_text().trim().is_empty()
    })
}

#[cfg(test)]
#[path = "tests/comment_tests.rs"]
mod tests;
