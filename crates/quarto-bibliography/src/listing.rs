/*
 * listing.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliography listing declarations and their rendered slots.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use quarto_bib_style::Output;
use quarto_error_reporting::{DiagnosticCollector, SourceLocation};
use serde::{Deserialize, Serialize};

use crate::error::CitationError;

/// Identity of a listing: the document that declares it plus an id unique
/// within that document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingKey {
    pub docname: String,
    pub id: String,
}

impl ListingKey {
    pub fn new(docname: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            docname: docname.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.docname, self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionMode {
    #[default]
    Cited,
    NotCited,
    All,
}

/// How a listing picks its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    Mode(InclusionMode),
    /// Source of a filter expression, compiled at resolution time.
    Filter(String),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Mode(InclusionMode::Cited)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListShape {
    /// Labeled entries that citations link to.
    #[default]
    Citation,
    Bullet,
    Enumerated,
}

impl ListShape {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "citation" => Some(ListShape::Citation),
            "bullet" => Some(ListShape::Bullet),
            "enumerated" => Some(ListShape::Enumerated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumType {
    #[default]
    Arabic,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl EnumType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "arabic" => Some(EnumType::Arabic),
            "loweralpha" => Some(EnumType::LowerAlpha),
            "upperalpha" => Some(EnumType::UpperAlpha),
            "lowerroman" => Some(EnumType::LowerRoman),
            "upperroman" => Some(EnumType::UpperRoman),
            _ => None,
        }
    }

    /// The enumerator for item `n` (1-based).
    pub fn format(&self, n: usize) -> String {
        match self {
            EnumType::Arabic => n.to_string(),
            EnumType::LowerAlpha => alpha(n),
            EnumType::UpperAlpha => alpha(n).to_uppercase(),
            EnumType::LowerRoman => roman(n),
            EnumType::UpperRoman => roman(n).to_uppercase(),
        }
    }
}

fn alpha(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// First item number of an enumerated list. Other shapes always start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Start {
    At(usize),
    /// Continue after the previous enumerated list in the document.
    Continue,
}

impl Default for Start {
    fn default() -> Self {
        Start::At(1)
    }
}

/// A bibliography listing as declared in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDeclaration {
    pub key: ListingKey,
    pub line: Option<usize>,
    /// Bib files to draw entries from; empty means the configured ones.
    pub bibfiles: Vec<PathBuf>,
    pub selection: Selection,
    pub key_prefix: String,
    pub label_prefix: String,
    pub list: ListShape,
    pub enumtype: EnumType,
    pub start: Start,
    /// Formatting style; `None` uses the configured default.
    pub style: Option<String>,
}

impl ListingDeclaration {
    pub fn new(docname: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            key: ListingKey::new(docname, id),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_filter(self, filter: impl Into<String>) -> Self {
        self.with_selection(Selection::Filter(filter.into()))
    }

    pub fn with_bibfiles<I, P>(mut self, bibfiles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.bibfiles = bibfiles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_list(mut self, list: ListShape) -> Self {
        self.list = list;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn with_start(mut self, start: Start) -> Self {
        self.start = start;
        self
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.key.docname.clone(), self.line)
    }

    /// Build a declaration from directive arguments (bib files) and options.
    ///
    /// Flag options (`cited`, `notcited`, `all`) take no value. Problems are
    /// reported to `diagnostics` and never fail the declaration: a filter
    /// wins over flags, invalid values fall back to their defaults, and
    /// unknown options are ignored.
    pub fn from_options(
        docname: &str,
        id: &str,
        line: Option<usize>,
        arguments: &[&str],
        options: &IndexMap<String, String>,
        diagnostics: &mut DiagnosticCollector,
    ) -> Self {
        let mut decl = ListingDeclaration::new(docname, id);
        decl.line = line;
        decl.bibfiles = arguments
            .iter()
            .flat_map(|arg| arg.split_whitespace())
            .map(PathBuf::from)
            .collect();
        let location = decl.location();
        let mut report = |error: CitationError| {
            diagnostics.add(error.to_diagnostic(Some(location.clone())));
        };

        let mut flags = Vec::new();
        let mut filter = None;
        for (option, value) in options {
            let value = value.trim();
            match option.as_str() {
                "cited" => flags.push((option.as_str(), InclusionMode::Cited)),
                "notcited" => flags.push((option.as_str(), InclusionMode::NotCited)),
                "all" => flags.push((option.as_str(), InclusionMode::All)),
                "filter" => filter = Some(value.to_string()),
                "list" => match ListShape::parse(value) {
                    Some(list) => decl.list = list,
                    None => report(invalid(option, value)),
                },
                "enumtype" => match EnumType::parse(value) {
                    Some(enumtype) => decl.enumtype = enumtype,
                    None => report(invalid(option, value)),
                },
                "start" => match value {
                    "continue" => decl.start = Start::Continue,
                    _ => match value.parse::<usize>() {
                        Ok(n) if n > 0 => decl.start = Start::At(n),
                        _ => report(invalid(option, value)),
                    },
                },
                "style" => decl.style = Some(value.to_string()),
                "labelprefix" => decl.label_prefix = value.to_string(),
                "keyprefix" => decl.key_prefix = value.to_string(),
                _ => report(CitationError::UnknownOption {
                    option: option.clone(),
                }),
            }
        }

        decl.selection = match (filter, flags.as_slice()) {
            (Some(filter), []) => Selection::Filter(filter),
            (Some(filter), _) => {
                let mut names: Vec<&str> = flags.iter().map(|(name, _)| *name).collect();
                names.push("filter");
                report(CitationError::ConflictingOptions {
                    options: names.join(", "),
                    used: "filter".to_string(),
                });
                Selection::Filter(filter)
            }
            (None, []) => Selection::default(),
            (None, [(_, mode)]) => Selection::Mode(*mode),
            (None, _) => {
                // The broadest flag wins.
                let (used, mode) = [
                    ("all", InclusionMode::All),
                    ("notcited", InclusionMode::NotCited),
                    ("cited", InclusionMode::Cited),
                ]
                .into_iter()
                .find(|(name, _)| flags.iter().any(|(flag, _)| flag == name))
                .unwrap_or(("cited", InclusionMode::Cited));
                let names: Vec<&str> = flags.iter().map(|(name, _)| *name).collect();
                report(CitationError::ConflictingOptions {
                    options: names.join(", "),
                    used: used.to_string(),
                });
                Selection::Mode(mode)
            }
        };
        decl
    }
}

fn invalid(option: &str, value: &str) -> CitationError {
    CitationError::InvalidOption {
        option: option.to_string(),
        value: value.to_string(),
    }
}

/// One rendered item of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotItem {
    /// Prefixed citation key.
    pub key: String,
    pub label: String,
    pub anchor: String,
    pub text: Output,
}

/// The rendered contents of a listing, looked up by [`ListingKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSlot {
    pub key: ListingKey,
    /// Anchor of the listing itself.
    pub anchor: String,
    pub list: ListShape,
    pub enumtype: EnumType,
    /// Number of the first item.
    pub start: usize,
    pub items: Vec<SlotItem>,
}

impl ListingSlot {
    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.key.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    /// Markdown-ish rendering, one item per line.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| match self.list {
                ListShape::Citation => format!("[{}] {}", item.label, item.text.render()),
                ListShape::Bullet => format!("- {}", item.text.render()),
                ListShape::Enumerated => format!(
                    "{}. {}",
                    self.enumtype.format(self.start + i),
                    item.text.render()
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_html(&self) -> String {
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| match self.list {
                ListShape::Citation => format!(
                    "<div class=\"citation\" id=\"{}\"><span class=\"label\">[{}]</span> {}</div>",
                    item.anchor,
                    quarto_bib_style::output::escape_html(&item.label),
                    item.text.render_html()
                ),
                ListShape::Bullet | ListShape::Enumerated => {
                    format!("<li id=\"{}\">{}</li>", item.anchor, item.text.render_html())
                }
            })
            .collect();
        match self.list {
            ListShape::Citation => format!(
                "<div class=\"bibliography\" id=\"{}\">\n{}\n</div>",
                self.anchor,
                items.join("\n")
            ),
            ListShape::Bullet => format!("<ul id=\"{}\">\n{}\n</ul>", self.anchor, items.join("\n")),
            ListShape::Enumerated => format!(
                "<ol id=\"{}\" type=\"{}\" start=\"{}\">\n{}\n</ol>",
                self.anchor,
                self.enumtype.format(1),
                self.start,
                items.join("\n")
            ),
        }
    }
}
