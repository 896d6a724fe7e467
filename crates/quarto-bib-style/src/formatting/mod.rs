/*
 * formatting/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliography formatting styles.
//!
//! A formatting style turns the ordered entries of one listing into labeled,
//! rendered items. It may re-sort the entries first (`plain`, `alpha`) or keep
//! the order it was given (`unsrt`, `unsrtalpha`).

pub mod labels;
pub mod sort;
pub mod templates;

use std::fmt::Debug;

use quarto_bibtex::BibEntry;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::output::Output;
use crate::template::TemplateContext;

/// One rendered listing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedEntry {
    pub key: String,
    pub label: String,
    pub text: Output,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedBibliography {
    /// Items in final listing order.
    pub entries: Vec<FormattedEntry>,
    /// Entries whose body degraded to a missing-field marker.
    pub errors: Vec<TemplateError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// First numeric label.
    pub start: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { start: 1 }
    }
}

pub trait FormattingStyle: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn format_entries(&self, entries: &[BibEntry], options: &FormatOptions) -> FormattedBibliography;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Numeric,
    Alpha,
}

/// The built-in formatting styles differ only in sorting and labels.
#[derive(Debug, Clone)]
pub struct BibliographyStyle {
    name: &'static str,
    sorted: bool,
    labels: LabelKind,
}

impl BibliographyStyle {
    /// Sorted by author, year and title; numeric labels.
    pub fn plain() -> Self {
        Self {
            name: "plain",
            sorted: true,
            labels: LabelKind::Numeric,
        }
    }

    /// Citation order; numeric labels.
    pub fn unsrt() -> Self {
        Self {
            name: "unsrt",
            sorted: false,
            labels: LabelKind::Numeric,
        }
    }

    /// Sorted by author, year and title; alphabetic labels.
    pub fn alpha() -> Self {
        Self {
            name: "alpha",
            sorted: true,
            labels: LabelKind::Alpha,
        }
    }

    /// Citation order; alphabetic labels.
    pub fn unsrtalpha() -> Self {
        Self {
            name: "unsrtalpha",
            sorted: false,
            labels: LabelKind::Alpha,
        }
    }
}

impl FormattingStyle for BibliographyStyle {
    fn name(&self) -> &str {
        self.name
    }

    fn format_entries(&self, entries: &[BibEntry], options: &FormatOptions) -> FormattedBibliography {
        let mut keyed: Vec<(Vec<String>, &BibEntry)> = entries
            .iter()
            .map(|entry| {
                let key = if self.sorted {
                    sort::author_year_title_key(entry)
                } else {
                    Vec::new()
                };
                (key, entry)
            })
            .collect();
        if self.sorted {
            // Stable, so ties keep citation order.
            keyed.sort_by(|(a, _), (b, _)| sort::compare_sort_keys(a, b));
        }

        let owned: Vec<BibEntry> = keyed.into_iter().map(|(_, e)| e.clone()).collect();
        let labels = match self.labels {
            LabelKind::Numeric => labels::numeric_labels(owned.len(), options.start),
            LabelKind::Alpha => labels::alpha_labels(&owned),
        };

        let persons = templates::body_person_policy();
        let mut result = FormattedBibliography::default();
        for (entry, label) in owned.iter().zip(labels) {
            let ctx = TemplateContext {
                entry,
                persons: &persons,
            };
            let (text, error) = templates::body_template(&entry.entry_type).render_or_marker(&ctx);
            if let Some(error) = error {
                tracing::debug!(key = %entry.key, "{}", error);
                result.errors.push(error);
            }
            result.entries.push(FormattedEntry {
                key: entry.key.clone(),
                label,
                text,
            });
        }
        result
    }
}
