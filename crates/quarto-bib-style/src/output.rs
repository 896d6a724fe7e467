//! Rich text produced by reference and formatting styles.
//!
//! Styles build an `Output` tree; hosts render it with [`Output::render`]
//! (light markdown), [`Output::to_plain_text`] (no markup, used for tooltips)
//! or [`Output::render_html`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Output AST
// ============================================================================

/// Semantic tags for output nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    /// The label of one reference (`[1]`, `Knu84`).
    Label,
    /// A rendered list of names.
    Names,
    /// A year.
    Year,
    /// Everything rendered for one cited key.
    Item(String),
    /// Reference to a footnote holding the entry, by footnote id.
    FootnoteRef(String),
    /// An inline error marker.
    Error,
}

/// Character-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Formatting {
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    pub fn superscript() -> Self {
        Self {
            superscript: true,
            ..Default::default()
        }
    }

    /// Plain wrapping in `prefix` and `suffix`.
    pub fn wrap(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        let (prefix, suffix) = (prefix.into(), suffix.into());
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            suffix: (!suffix.is_empty()).then_some(suffix),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Output {
    /// A formatted group of children.
    Formatted {
        formatting: Formatting,
        children: Vec<Output>,
    },
    /// A hyperlink wrapping children, optionally with a tooltip.
    Linked {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Output>,
    },
    /// Content that belongs in a footnote.
    InNote(Box<Output>),
    /// Literal text content.
    Literal(String),
    /// Semantically tagged content.
    Tagged { tag: Tag, child: Box<Output> },
    /// Empty output.
    Null,
}

impl Output {
    /// Create a literal text node.
    pub fn literal(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Output::Null
        } else {
            Output::Literal(s)
        }
    }

    /// Create a formatted node with children.
    pub fn formatted(formatting: Formatting, children: Vec<Output>) -> Self {
        let children: Vec<_> = children.into_iter().filter(|c| !c.is_null()).collect();
        if children.is_empty() {
            Output::Null
        } else {
            Output::Formatted {
                formatting,
                children,
            }
        }
    }

    /// Create a tagged node.
    pub fn tagged(tag: Tag, child: Output) -> Self {
        if child.is_null() {
            Output::Null
        } else {
            Output::Tagged {
                tag,
                child: Box::new(child),
            }
        }
    }

    /// Create a linked node.
    pub fn linked(url: impl Into<String>, title: Option<String>, children: Vec<Output>) -> Self {
        let children: Vec<_> = children.into_iter().filter(|c| !c.is_null()).collect();
        if children.is_empty() {
            Output::Null
        } else {
            Output::Linked {
                url: url.into(),
                title,
                children,
            }
        }
    }

    /// Create a sequence of outputs.
    pub fn sequence(children: Vec<Output>) -> Self {
        let mut children: Vec<_> = children.into_iter().filter(|c| !c.is_null()).collect();
        match children.len() {
            0 => Output::Null,
            1 => children.remove(0),
            _ => Output::Formatted {
                formatting: Formatting::default(),
                children,
            },
        }
    }

    /// An inline error marker such as `[key not found: knuth84]`.
    pub fn error(message: impl Into<String>) -> Self {
        Output::tagged(Tag::Error, Output::literal(format!("[{}]", message.into())))
    }

    pub fn is_null(&self) -> bool {
        match self {
            Output::Null => true,
            Output::Literal(s) => s.is_empty(),
            Output::Formatted { children, .. } => children.iter().all(|c| c.is_null()),
            Output::Linked { children, .. } => children.iter().all(|c| c.is_null()),
            Output::InNote(child) => child.is_null(),
            Output::Tagged { child, .. } => child.is_null(),
        }
    }

    /// Whether the tree contains an inline error marker.
    pub fn has_error(&self) -> bool {
        match self {
            Output::Null | Output::Literal(_) => false,
            Output::Formatted { children, .. } | Output::Linked { children, .. } => {
                children.iter().any(|c| c.has_error())
            }
            Output::InNote(child) => child.has_error(),
            Output::Tagged { tag, child } => *tag == Tag::Error || child.has_error(),
        }
    }

    /// Upper-case the first letter of the first literal in the tree.
    pub fn capitalize_first(self) -> Output {
        let mut done = false;
        self.capitalize_inner(&mut done)
    }

    fn capitalize_inner(self, done: &mut bool) -> Output {
        if *done {
            return self;
        }
        match self {
            Output::Literal(s) => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => {
                        *done = true;
                        Output::Literal(first.to_uppercase().chain(chars).collect())
                    }
                    None => Output::Literal(s),
                }
            }
            Output::Formatted {
                formatting,
                children,
            } => Output::Formatted {
                formatting,
                children: children
                    .into_iter()
                    .map(|c| c.capitalize_inner(done))
                    .collect(),
            },
            Output::Linked {
                url,
                title,
                children,
            } => Output::Linked {
                url,
                title,
                children: children
                    .into_iter()
                    .map(|c| c.capitalize_inner(done))
                    .collect(),
            },
            Output::InNote(child) => Output::InNote(Box::new(child.capitalize_inner(done))),
            Output::Tagged { tag, child } => Output::Tagged {
                tag,
                child: Box::new(child.capitalize_inner(done)),
            },
            Output::Null => Output::Null,
        }
    }

    /// Render with light markdown markup (`*italic*`, `^super^`).
    pub fn render(&self) -> String {
        match self {
            Output::Null => String::new(),
            Output::Literal(s) => s.clone(),
            Output::Formatted {
                formatting,
                children,
            } => {
                let inner: String = children.iter().map(|c| c.render()).collect();
                render_with_formatting(&inner, formatting)
            }
            // Plain rendering keeps link text only
            Output::Linked { children, .. } => children.iter().map(|c| c.render()).collect(),
            Output::InNote(child) => child.render(),
            Output::Tagged {
                tag: Tag::FootnoteRef(id),
                ..
            } => format!("[^{}]", id),
            Output::Tagged { child, .. } => child.render(),
        }
    }

    /// Render without any markup.
    pub fn to_plain_text(&self) -> String {
        match self {
            Output::Null => String::new(),
            Output::Literal(s) => s.clone(),
            Output::Formatted {
                formatting,
                children,
            } => {
                let mut out = formatting.prefix.clone().unwrap_or_default();
                out.extend(children.iter().map(|c| c.to_plain_text()));
                if let Some(suffix) = &formatting.suffix {
                    out.push_str(suffix);
                }
                out
            }
            Output::Linked { children, .. } => children.iter().map(|c| c.to_plain_text()).collect(),
            Output::InNote(child) => child.to_plain_text(),
            Output::Tagged { child, .. } => child.to_plain_text(),
        }
    }

    /// Render to an HTML fragment.
    pub fn render_html(&self) -> String {
        match self {
            Output::Null => String::new(),
            Output::Literal(s) => escape_html(s),
            Output::Formatted {
                formatting,
                children,
            } => {
                let mut inner: String = children.iter().map(|c| c.render_html()).collect();
                if formatting.italic {
                    inner = format!("<em>{}</em>", inner);
                }
                if formatting.bold {
                    inner = format!("<strong>{}</strong>", inner);
                }
                if formatting.superscript {
                    inner = format!("<sup>{}</sup>", inner);
                }
                format!(
                    "{}{}{}",
                    escape_html(formatting.prefix.as_deref().unwrap_or_default()),
                    inner,
                    escape_html(formatting.suffix.as_deref().unwrap_or_default())
                )
            }
            Output::Linked {
                url,
                title,
                children,
            } => {
                let inner: String = children.iter().map(|c| c.render_html()).collect();
                match title {
                    Some(title) => format!(
                        "<a href=\"{}\" title=\"{}\">{}</a>",
                        escape_html(url),
                        escape_html(title),
                        inner
                    ),
                    None => format!("<a href=\"{}\">{}</a>", escape_html(url), inner),
                }
            }
            Output::InNote(child) => {
                format!("<span class=\"footnote\">{}</span>", child.render_html())
            }
            Output::Tagged {
                tag: Tag::FootnoteRef(id),
                child,
            } => format!(
                "<sup class=\"footnote-ref\"><a href=\"#{}\">{}</a></sup>",
                escape_html(id),
                child.render_html()
            ),
            Output::Tagged {
                tag: Tag::Error,
                child,
            } => format!("<span class=\"error\">{}</span>", child.render_html()),
            Output::Tagged { child, .. } => child.render_html(),
        }
    }
}

fn render_with_formatting(text: &str, formatting: &Formatting) -> String {
    let mut inner = text.to_string();
    if formatting.italic {
        inner = format!("*{}*", inner);
    }
    if formatting.bold {
        inner = format!("**{}**", inner);
    }
    if formatting.superscript {
        inner = format!("^{}^", inner);
    }
    format!(
        "{}{}{}",
        formatting.prefix.as_deref().unwrap_or_default(),
        inner,
        formatting.suffix.as_deref().unwrap_or_default()
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Join multiple outputs with a delimiter.
pub fn join_outputs(outputs: Vec<Output>, delimiter: &str) -> Output {
    join_outputs_with(outputs, delimiter, delimiter, delimiter)
}

/// Join outputs the way name lists are joined: `sep2` when there are
/// exactly two, otherwise `sep` between all but the last pair and
/// `last_sep` before the final item.
pub fn join_outputs_with(outputs: Vec<Output>, sep: &str, sep2: &str, last_sep: &str) -> Output {
    let mut non_null: Vec<_> = outputs.into_iter().filter(|o| !o.is_null()).collect();

    match non_null.len() {
        0 => return Output::Null,
        1 => return non_null.remove(0),
        _ => {}
    }

    let count = non_null.len();
    let mut children = Vec::with_capacity(count * 2);
    for (i, output) in non_null.into_iter().enumerate() {
        if i > 0 {
            let delimiter = if count == 2 {
                sep2
            } else if i == count - 1 {
                last_sep
            } else {
                sep
            };
            if !delimiter.is_empty() {
                children.push(Output::Literal(delimiter.to_string()));
            }
        }
        children.push(output);
    }

    Output::Formatted {
        formatting: Formatting::default(),
        children,
    }
}
