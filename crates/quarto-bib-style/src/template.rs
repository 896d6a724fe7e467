/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Small combinator language for rendering entry fields.
//!
//! Templates are plain values built with the helper functions below:
//!
//! ```
//! use quarto_bib_style::template::{field, join, names, optional, sentence};
//!
//! let article = join(" ", vec![
//!     sentence(vec![names("author")]),
//!     sentence(vec![field("title")]),
//!     sentence(vec![field("journal"), optional(field("volume")), field("year")]),
//! ]);
//! ```
//!
//! Rendering fails with [`TemplateError::MissingField`] as soon as a required
//! field is absent; [`optional`] turns that failure into empty output.

use quarto_bibtex::BibEntry;

use crate::error::TemplateError;
use crate::output::{Formatting, Output, Tag, join_outputs};
use crate::policy::PersonPolicy;

/// Data a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub entry: &'a BibEntry,
    pub persons: &'a PersonPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Text(String),
    /// A field value with LaTeX markup stripped.
    Field(String),
    /// A person list (`author`, `editor`) under the context's policy.
    Names { role: String, full: bool },
    /// Non-empty parts joined by `sep`.
    Join { sep: String, parts: Vec<Template> },
    /// Parts joined by `, `, first letter capitalized, closed with a period.
    Sentence(Vec<Template>),
    Optional(Box<Template>),
    /// The first alternative that renders.
    FirstOf(Vec<Template>),
    Styled {
        formatting: Formatting,
        child: Box<Template>,
    },
}

pub fn text(s: impl Into<String>) -> Template {
    Template::Text(s.into())
}

pub fn field(name: impl Into<String>) -> Template {
    Template::Field(name.into())
}

pub fn names(role: impl Into<String>) -> Template {
    Template::Names {
        role: role.into(),
        full: true,
    }
}

pub fn join(sep: impl Into<String>, parts: Vec<Template>) -> Template {
    Template::Join {
        sep: sep.into(),
        parts,
    }
}

pub fn words(parts: Vec<Template>) -> Template {
    join(" ", parts)
}

pub fn sentence(parts: Vec<Template>) -> Template {
    Template::Sentence(parts)
}

pub fn optional(template: Template) -> Template {
    Template::Optional(Box::new(template))
}

pub fn first_of(alternatives: Vec<Template>) -> Template {
    Template::FirstOf(alternatives)
}

pub fn italic(template: Template) -> Template {
    Template::Styled {
        formatting: Formatting::italic(),
        child: Box::new(template),
    }
}

impl Template {
    pub fn render(&self, ctx: &TemplateContext<'_>) -> Result<Output, TemplateError> {
        match self {
            Template::Text(s) => Ok(Output::literal(s.clone())),
            Template::Field(name) => match ctx.entry.plain_field(name) {
                Some(value) if !value.trim().is_empty() => Ok(Output::literal(value)),
                _ => Err(TemplateError::missing(name, &ctx.entry.key)),
            },
            Template::Names { role, full } => match ctx.entry.persons(role) {
                Some(persons) => Ok(ctx.persons.format_persons(persons, *full)),
                None => Err(TemplateError::missing(role, &ctx.entry.key)),
            },
            Template::Join { sep, parts } => {
                let rendered = parts
                    .iter()
                    .map(|p| p.render(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(join_outputs(rendered, sep))
            }
            Template::Sentence(parts) => {
                let rendered = parts
                    .iter()
                    .map(|p| p.render(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                let body = join_outputs(rendered, ", ");
                if body.is_null() {
                    return Ok(Output::Null);
                }
                let closing = if body.to_plain_text().ends_with(['.', '?', '!']) {
                    ""
                } else {
                    "."
                };
                Ok(Output::formatted(
                    Formatting::wrap("", closing),
                    vec![body.capitalize_first()],
                ))
            }
            Template::Optional(inner) => match inner.render(ctx) {
                Ok(output) => Ok(output),
                Err(TemplateError::MissingField { .. }) => Ok(Output::Null),
            },
            Template::FirstOf(alternatives) => {
                let mut first_error = None;
                for alternative in alternatives {
                    match alternative.render(ctx) {
                        Ok(output) if !output.is_null() => return Ok(output),
                        Ok(_) => {}
                        Err(err) => {
                            first_error.get_or_insert(err);
                        }
                    }
                }
                match first_error {
                    Some(err) => Err(err),
                    None => Ok(Output::Null),
                }
            }
            Template::Styled { formatting, child } => {
                Ok(Output::formatted(formatting.clone(), vec![child.render(ctx)?]))
            }
        }
    }

    /// Render, or fall back to the inline error marker.
    pub fn render_or_marker(&self, ctx: &TemplateContext<'_>) -> (Output, Option<TemplateError>) {
        match self.render(ctx) {
            Ok(output) => (output, None),
            Err(err) => (
                Output::tagged(Tag::Error, Output::literal(err.marker())),
                Some(err),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(template: &Template, entry: &BibEntry) -> Result<String, TemplateError> {
        let persons = PersonPolicy::default();
        template
            .render(&TemplateContext {
                entry,
                persons: &persons,
            })
            .map(|o| o.render())
    }

    #[test]
    fn test_sentence_and_optional() {
        let entry = BibEntry::new("article", "k")
            .with_field("title", "the {TeX}book")
            .with_field("year", "1984");
        let template = words(
            vec![
                sentence(vec![field("title")]),
                sentence(vec![optional(field("journal")), field("year")]),
            ],
        );
        assert_eq!(render(&template, &entry).unwrap(), "The TeXbook. 1984.");
    }

    #[test]
    fn test_missing_required_field() {
        let entry = BibEntry::new("article", "k").with_field("title", "T");
        let template = sentence(vec![names("author"), field("title")]);
        assert_eq!(
            render(&template, &entry),
            Err(TemplateError::missing("author", "k"))
        );
    }

    #[test]
    fn test_first_of_falls_back() {
        let entry = BibEntry::new("book", "k").with_persons("editor", "Grace Hopper");
        let template = first_of(vec![names("author"), names("editor")]);
        assert_eq!(render(&template, &entry).unwrap(), "Hopper");

        let bare = BibEntry::new("book", "k");
        assert_eq!(
            render(&template, &bare),
            Err(TemplateError::missing("author", "k"))
        );
    }

    #[test]
    fn test_sentence_keeps_existing_period() {
        let entry = BibEntry::new("misc", "k").with_field("note", "Vol. 2 forthc.");
        assert_eq!(
            render(&sentence(vec![field("note")]), &entry).unwrap(),
            "Vol. 2 forthc."
        );
    }

    #[test]
    fn test_render_or_marker() {
        let entry = BibEntry::new("misc", "k");
        let persons = PersonPolicy::default();
        let ctx = TemplateContext {
            entry: &entry,
            persons: &persons,
        };
        let (output, err) = italic(field("title")).render_or_marker(&ctx);
        assert_eq!(output.render(), "[missing field: title in k]");
        assert!(err.is_some());
    }
}
