/*
 * reference/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reference styles: how a citation occurrence renders for a role.
 */

//! Reference styles.
//!
//! A reference style answers a fixed set of role names (`p`, `ct`, `alps`,
//! `author`, `yearpar`, ...). Rendering a role takes the references of one
//! citation occurrence and produces a single [`Output`].
//!
//! [`BasicReferenceStyle`] handles one citation form (parenthetical,
//! textual, author, label, year or text) and generates its role table at
//! construction. [`GroupReferenceStyle`] combines several of them and
//! dispatches by role name; the built-in styles in [`builtin`] are groups.

pub mod builtin;

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use quarto_bibtex::BibEntry;

use crate::error::{Result, StyleError, TemplateError};
use crate::output::{Formatting, Output, Tag, join_outputs, join_outputs_with};
use crate::policy::{BracketPolicy, PersonPolicy};
use crate::template::{Template, TemplateContext, first_of};

type TemplateResult<T> = std::result::Result<T, TemplateError>;

/// One cited key within a citation occurrence.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceInfo<'a> {
    pub key: &'a str,
    /// `None` when the key could not be resolved.
    pub target: Option<ReferenceTarget<'a>>,
    pub pre_text: &'a str,
    pub post_text: &'a str,
}

/// The resolved entry behind a reference.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTarget<'a> {
    pub entry: &'a BibEntry,
    /// Label assigned by the listing (`1`, `Knu84`).
    pub label: &'a str,
    /// Formatted bibliography body of the entry.
    pub text: &'a Output,
    /// Id of the listing item the reference links to.
    pub anchor: &'a str,
    pub tooltip: Option<&'a str>,
}

/// Result of rendering one citation occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCitation {
    pub output: Output,
    /// References that rendered as missing-field markers.
    pub errors: Vec<TemplateError>,
}

pub trait ReferenceStyle: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Every role this style answers, in a stable order.
    fn role_names(&self) -> Vec<String>;

    fn render(&self, role: &str, references: &[ReferenceInfo<'_>]) -> Result<RenderedCitation>;
}

/// The shape of a citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationForm {
    /// `[1, 2]`, `(Knuth, 1984)`
    Parenthetical,
    /// `Knuth [1]`, `Knuth (1984)`
    Textual,
    /// `Knuth`
    Author,
    /// `1`, `[1]`
    Label,
    /// `1984`, `(1984)`
    Year,
    /// The full bibliography text of the entry.
    Text,
}

/// How a single reference is marked in running text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMark {
    Label,
    AuthorYear,
    /// Superscript label.
    Superscript,
    /// Reference to the entry's footnote.
    Footnote,
}

/// The options a role name encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub brackets: bool,
    /// Capitalize the first letter (`c` prefix).
    pub capfirst: bool,
    /// Full author list instead of the `et al.` cutoff (`s` suffix).
    pub full_authors: bool,
}

/// Which role variants a form supports in a given style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleVariants {
    pub capfirst: bool,
    pub full_authors: bool,
    pub unbracketed: bool,
}

impl RoleVariants {
    pub const ALL: RoleVariants = RoleVariants {
        capfirst: true,
        full_authors: true,
        unbracketed: true,
    };
}

/// Build the role table of a form.
///
/// Parenthetical and textual roles are named `{c}{al}{p|t}{s}`, author
/// roles `{c}author{s}`, label and year roles `label`/`labelpar` and
/// `year`/`yearpar`.
pub fn role_table(form: CitationForm, variants: RoleVariants) -> IndexMap<String, RoleSpec> {
    let mut roles = IndexMap::new();
    let flags = |enabled: bool| if enabled { vec![false, true] } else { vec![false] };

    match form {
        CitationForm::Parenthetical | CitationForm::Textual => {
            let base = if form == CitationForm::Parenthetical { "p" } else { "t" };
            for unbracketed in flags(variants.unbracketed) {
                for capfirst in flags(variants.capfirst) {
                    for full_authors in flags(variants.full_authors) {
                        let name = format!(
                            "{}{}{}{}",
                            if capfirst { "c" } else { "" },
                            if unbracketed { "al" } else { "" },
                            base,
                            if full_authors { "s" } else { "" },
                        );
                        roles.insert(
                            name,
                            RoleSpec {
                                brackets: !unbracketed,
                                capfirst,
                                full_authors,
                            },
                        );
                    }
                }
            }
        }
        CitationForm::Author => {
            for capfirst in [false, true] {
                for full_authors in [false, true] {
                    let name = format!(
                        "{}author{}",
                        if capfirst { "c" } else { "" },
                        if full_authors { "s" } else { "" }
                    );
                    roles.insert(
                        name,
                        RoleSpec {
                            brackets: false,
                            capfirst,
                            full_authors,
                        },
                    );
                }
            }
        }
        CitationForm::Label | CitationForm::Year => {
            let base = if form == CitationForm::Label { "label" } else { "year" };
            for brackets in [false, true] {
                let name = format!("{}{}", base, if brackets { "par" } else { "" });
                roles.insert(
                    name,
                    RoleSpec {
                        brackets,
                        capfirst: false,
                        full_authors: false,
                    },
                );
            }
        }
        CitationForm::Text => {
            roles.insert(
                "text".to_string(),
                RoleSpec {
                    brackets: false,
                    capfirst: false,
                    full_authors: false,
                },
            );
        }
    }
    roles
}

/// A style for a single citation form.
#[derive(Debug, Clone)]
pub struct BasicReferenceStyle {
    name: String,
    form: CitationForm,
    mark: ReferenceMark,
    bracket: BracketPolicy,
    person: PersonPolicy,
    /// Between names and year in author-year marks.
    author_year_sep: String,
    roles: IndexMap<String, RoleSpec>,
}

impl BasicReferenceStyle {
    pub fn new(
        name: impl Into<String>,
        form: CitationForm,
        mark: ReferenceMark,
        variants: RoleVariants,
        bracket: BracketPolicy,
        person: PersonPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            form,
            mark,
            bracket,
            person,
            author_year_sep: ", ".to_string(),
            roles: role_table(form, variants),
        }
    }

    pub fn form(&self) -> CitationForm {
        self.form
    }

    fn names_template(full: bool) -> Template {
        first_of(vec![
            Template::Names {
                role: "author".to_string(),
                full,
            },
            Template::Names {
                role: "editor".to_string(),
                full,
            },
        ])
    }

    fn names(&self, target: &ReferenceTarget<'_>, full: bool) -> TemplateResult<Output> {
        Self::names_template(full).render(&TemplateContext {
            entry: target.entry,
            persons: &self.person,
        })
    }

    fn year(&self, target: &ReferenceTarget<'_>) -> TemplateResult<Output> {
        Template::Field("year".to_string()).render(&TemplateContext {
            entry: target.entry,
            persons: &self.person,
        })
    }

    fn link(&self, target: &ReferenceTarget<'_>, content: Output) -> Output {
        Output::linked(
            format!("#{}", target.anchor),
            target.tooltip.map(str::to_string),
            vec![content],
        )
    }

    fn bracketed(&self, content: Output, brackets: bool) -> Output {
        if brackets {
            Output::formatted(
                Formatting::wrap(self.bracket.left.clone(), self.bracket.right.clone()),
                vec![content],
            )
        } else {
            content
        }
    }

    /// Pre/post text around one reference: `see [1, p. 5]`.
    fn with_pre_post(&self, reference: &ReferenceInfo<'_>, content: Output) -> Output {
        let pre = if reference.pre_text.is_empty() {
            Output::Null
        } else {
            Output::literal(format!("{}{}", reference.pre_text, self.bracket.pre_sep))
        };
        let post = if reference.post_text.is_empty() {
            Output::Null
        } else {
            Output::literal(format!("{}{}", self.bracket.post_sep, reference.post_text))
        };
        Output::sequence(vec![pre, content, post])
    }

    /// The mark of one reference inside a parenthetical citation.
    fn mark(&self, target: &ReferenceTarget<'_>, spec: &RoleSpec) -> TemplateResult<Output> {
        Ok(match self.mark {
            ReferenceMark::Label | ReferenceMark::Superscript => Output::tagged(
                Tag::Label,
                self.link(target, Output::literal(target.label)),
            ),
            ReferenceMark::AuthorYear => {
                let names = self.names(target, spec.full_authors)?;
                let year = Output::tagged(Tag::Year, self.link(target, self.year(target)?));
                Output::sequence(vec![names, Output::literal(self.author_year_sep.clone()), year])
            }
            ReferenceMark::Footnote => Output::tagged(
                Tag::FootnoteRef(target.anchor.to_string()),
                Output::literal(target.label),
            ),
        })
    }

    fn render_one(
        &self,
        reference: &ReferenceInfo<'_>,
        spec: &RoleSpec,
    ) -> TemplateResult<Output> {
        let Some(target) = &reference.target else {
            return Ok(Output::error(format!("key not found: {}", reference.key)));
        };
        let output = match self.form {
            CitationForm::Parenthetical => self.with_pre_post(reference, self.mark(target, spec)?),
            CitationForm::Textual => {
                let names = self.names(target, spec.full_authors)?;
                let mark = match self.mark {
                    ReferenceMark::AuthorYear => {
                        Output::tagged(Tag::Year, self.link(target, self.year(target)?))
                    }
                    _ => self.mark(target, spec)?,
                };
                let mark = self.with_pre_post(
                    &ReferenceInfo {
                        pre_text: "",
                        ..*reference
                    },
                    mark,
                );
                let mark = match self.mark {
                    ReferenceMark::Superscript => {
                        Output::formatted(Formatting::superscript(), vec![mark])
                    }
                    ReferenceMark::Footnote => mark,
                    ReferenceMark::Label | ReferenceMark::AuthorYear => Output::sequence(vec![
                        Output::literal(" "),
                        self.bracketed(mark, spec.brackets),
                    ]),
                };
                let pre = if reference.pre_text.is_empty() {
                    Output::Null
                } else {
                    Output::literal(format!("{} ", reference.pre_text))
                };
                Output::sequence(vec![pre, names, mark])
            }
            CitationForm::Author => {
                let names = self.names(target, spec.full_authors)?;
                self.with_pre_post(reference, self.link(target, names))
            }
            CitationForm::Label => self.with_pre_post(
                reference,
                Output::tagged(Tag::Label, self.link(target, Output::literal(target.label))),
            ),
            CitationForm::Year => self.with_pre_post(
                reference,
                Output::tagged(Tag::Year, self.link(target, self.year(target)?)),
            ),
            CitationForm::Text => self.with_pre_post(reference, target.text.clone()),
        };
        Ok(Output::tagged(Tag::Item(reference.key.to_string()), output))
    }
}

impl ReferenceStyle for BasicReferenceStyle {
    fn name(&self) -> &str {
        &self.name
    }

    fn role_names(&self) -> Vec<String> {
        self.roles.keys().cloned().collect()
    }

    fn render(&self, role: &str, references: &[ReferenceInfo<'_>]) -> Result<RenderedCitation> {
        let spec = self
            .roles
            .get(role)
            .ok_or_else(|| StyleError::UnknownRole {
                style: self.name.clone(),
                role: role.to_string(),
            })?;

        let mut errors = Vec::new();
        let items: Vec<Output> = references
            .iter()
            .map(|reference| match self.render_one(reference, spec) {
                Ok(output) => output,
                Err(err) => {
                    let marker = Output::error(err.to_string());
                    errors.push(err);
                    marker
                }
            })
            .collect();

        let output = match self.form {
            CitationForm::Parenthetical => {
                let joined = join_outputs(items, &self.bracket.sep);
                match self.mark {
                    ReferenceMark::Superscript => {
                        Output::formatted(Formatting::superscript(), vec![joined])
                    }
                    _ => self.bracketed(joined, spec.brackets),
                }
            }
            CitationForm::Textual | CitationForm::Author => join_outputs_with(
                items,
                &self.bracket.sep,
                &self.bracket.sep2,
                &self.bracket.last_sep,
            ),
            CitationForm::Label | CitationForm::Year => {
                self.bracketed(join_outputs(items, &self.bracket.sep), spec.brackets)
            }
            CitationForm::Text => join_outputs(items, " "),
        };
        let output = if spec.capfirst {
            output.capitalize_first()
        } else {
            output
        };

        Ok(RenderedCitation { output, errors })
    }
}

/// A style made of sub-styles, dispatching on role name.
#[derive(Debug, Clone)]
pub struct GroupReferenceStyle {
    name: String,
    styles: Vec<Arc<dyn ReferenceStyle>>,
    /// Role name to index in `styles`, first style wins.
    role_style: IndexMap<String, usize>,
}

impl GroupReferenceStyle {
    pub fn new(name: impl Into<String>, styles: Vec<Arc<dyn ReferenceStyle>>) -> Self {
        let mut role_style = IndexMap::new();
        for (index, style) in styles.iter().enumerate() {
            for role in style.role_names() {
                role_style.entry(role).or_insert(index);
            }
        }
        Self {
            name: name.into(),
            styles,
            role_style,
        }
    }
}

impl ReferenceStyle for GroupReferenceStyle {
    fn name(&self) -> &str {
        &self.name
    }

    fn role_names(&self) -> Vec<String> {
        self.role_style.keys().cloned().collect()
    }

    fn render(&self, role: &str, references: &[ReferenceInfo<'_>]) -> Result<RenderedCitation> {
        match self.role_style.get(role) {
            Some(&index) => self.styles[index].render(role, references),
            None => Err(StyleError::UnknownRole {
                style: self.name.clone(),
                role: role.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_table_parenthetical() {
        let names: Vec<_> = role_table(CitationForm::Parenthetical, RoleVariants::ALL)
            .into_keys()
            .collect();
        assert_eq!(
            names,
            vec!["p", "ps", "cp", "cps", "alp", "alps", "calp", "calps"]
        );
    }

    #[test]
    fn test_role_table_restricted() {
        let names: Vec<_> = role_table(
            CitationForm::Textual,
            RoleVariants {
                capfirst: true,
                full_authors: true,
                unbracketed: false,
            },
        )
        .into_keys()
        .collect();
        assert_eq!(names, vec!["t", "ts", "ct", "cts"]);
    }

    #[test]
    fn test_role_table_other_forms() {
        let author: Vec<_> = role_table(CitationForm::Author, RoleVariants::ALL)
            .into_keys()
            .collect();
        assert_eq!(author, vec!["author", "authors", "cauthor", "cauthors"]);
        let year: Vec<_> = role_table(CitationForm::Year, RoleVariants::ALL)
            .into_keys()
            .collect();
        assert_eq!(year, vec!["year", "yearpar"]);
    }

    #[test]
    fn test_group_unknown_role() {
        let group = GroupReferenceStyle::new("empty", vec![]);
        assert_eq!(
            group.render("p", &[]).unwrap_err(),
            StyleError::UnknownRole {
                style: "empty".to_string(),
                role: "p".to_string()
            }
        );
    }
}
