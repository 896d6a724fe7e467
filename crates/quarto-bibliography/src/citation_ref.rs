//! Citation occurrences in documents.
//!
//! The text of a citation role is a comma-separated list of keys, each with
//! optional pre- and post-text in braces:
//!
//! ```text
//! {see}knuth84{p. 5}, lamport94
//! ```

use quarto_error_reporting::SourceLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationTarget {
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pre_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_text: String,
}

impl CitationTarget {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Parse the text of a citation role. Empty items are skipped.
    pub fn parse_list(text: &str) -> Vec<CitationTarget> {
        split_top_level(text)
            .into_iter()
            .filter_map(parse_target)
            .collect()
    }
}

/// Split on commas outside braces.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Text of a leading `{...}` group and the remainder after it.
fn braced(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('{')?;
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    // Unclosed: everything is the group.
    Some((rest, ""))
}

fn parse_target(item: &str) -> Option<CitationTarget> {
    let mut rest = item.trim();
    let mut pre_text = "";
    if let Some((pre, after)) = braced(rest) {
        pre_text = pre;
        rest = after.trim_start();
    }
    let key_end = rest.find('{').unwrap_or(rest.len());
    let key = rest[..key_end].trim();
    let post_text = braced(&rest[key_end..]).map_or("", |(post, _)| post);
    if key.is_empty() {
        return None;
    }
    Some(CitationTarget {
        key: key.to_string(),
        pre_text: pre_text.trim().to_string(),
        post_text: post_text.trim().to_string(),
    })
}

/// One citation command in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRef {
    /// Unique id, assigned by the host.
    pub id: String,
    pub docname: String,
    pub line: Option<usize>,
    /// Role name, e.g. `p`, `t`, `cauthors`.
    pub role: String,
    pub targets: Vec<CitationTarget>,
}

impl CitationRef {
    pub fn new(
        id: impl Into<String>,
        docname: impl Into<String>,
        role: impl Into<String>,
        targets: Vec<CitationTarget>,
    ) -> Self {
        Self {
            id: id.into(),
            docname: docname.into(),
            line: None,
            role: role.into(),
            targets,
        }
    }

    /// Build a reference from role text, see [`CitationTarget::parse_list`].
    pub fn parse(
        id: impl Into<String>,
        docname: impl Into<String>,
        role: impl Into<String>,
        text: &str,
    ) -> Self {
        Self::new(id, docname, role, CitationTarget::parse_list(text))
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.key.as_str())
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.docname.clone(), self.line)
    }
}
