/*
 * foot.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Footnote citations.
//!
//! Footnote citations are local to a document. A footnote listing renders,
//! in first-citation order, every entry footcited in its document since the
//! previous footnote listing. Citations that no listing follows still get
//! footnote ids, so their references render, but no listing shows them.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::{IndexMap, IndexSet};
use quarto_bib_style::{
    FormatOptions, FormattingStyle, Output, ReferenceInfo, ReferenceStyle, ReferenceTarget,
};
use quarto_bibtex::BibEntry;
use quarto_error_reporting::{DiagnosticCollector, SourceLocation};
use serde::{Deserialize, Serialize};

use crate::citation_ref::CitationRef;
use crate::config::BibConfig;
use crate::domain::{key_not_found, render_references};
use crate::ids::{IdContext, expand_id};

/// What a document contributes, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FootEvent {
    Cite(CitationRef),
    Listing { id: String, line: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    pub key: String,
    /// Footnote id, from the `footcite_id` template.
    pub id: String,
    /// Position within its listing, from 1.
    pub label: String,
    pub entry: BibEntry,
    pub text: Output,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootListing {
    pub docname: String,
    /// `None` for the citations after the last listing of a document.
    pub id: Option<String>,
    pub anchor: String,
    /// 1-based count of this listing within its document.
    pub count: usize,
    pub footnotes: Vec<Footnote>,
}

impl FootListing {
    pub fn keys(&self) -> Vec<&str> {
        self.footnotes.iter().map(|f| f.key.as_str()).collect()
    }

    /// One `[^id]: text` line per footnote.
    pub fn render(&self) -> String {
        self.footnotes
            .iter()
            .map(|f| format!("[^{}]: {}", f.id, f.text.render()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootCitationDomain {
    documents: BTreeMap<String, Vec<FootEvent>>,
    /// Resolved listings per document, declared or not.
    listings: BTreeMap<String, Vec<FootListing>>,
    /// Citation id to the index of the listing holding its footnotes.
    assignments: BTreeMap<String, usize>,
}

impl FootCitationDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_citation(&mut self, citation_ref: CitationRef) {
        self.documents
            .entry(citation_ref.docname.clone())
            .or_default()
            .push(FootEvent::Cite(citation_ref));
    }

    pub fn add_listing(&mut self, docname: &str, id: impl Into<String>, line: Option<usize>) {
        self.documents
            .entry(docname.to_string())
            .or_default()
            .push(FootEvent::Listing {
                id: id.into(),
                line,
            });
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn events(&self, docname: &str) -> &[FootEvent] {
        self.documents.get(docname).map_or(&[], Vec::as_slice)
    }

    pub fn purge_document(&mut self, docname: &str) {
        self.documents.remove(docname);
        self.clear_resolved();
    }

    /// Take over the documents in `owned` from `other`.
    pub fn merge(&mut self, mut other: FootCitationDomain, owned: &BTreeSet<String>) {
        for docname in owned {
            self.documents.remove(docname);
            if let Some(events) = other.documents.remove(docname) {
                self.documents.insert(docname.clone(), events);
            }
        }
        self.clear_resolved();
    }

    pub(crate) fn clear_resolved(&mut self) {
        self.listings.clear();
        self.assignments.clear();
    }

    pub fn resolve(
        &mut self,
        entries: &IndexMap<String, BibEntry>,
        style: &dyn FormattingStyle,
        config: &BibConfig,
        diagnostics: &mut DiagnosticCollector,
    ) {
        self.clear_resolved();
        for (docname, events) in &self.documents {
            let mut listings = Vec::new();
            let mut pending_keys: IndexSet<&str> = IndexSet::new();
            let mut pending_refs: Vec<&str> = Vec::new();
            let mut last_line = None;
            for event in events {
                match event {
                    FootEvent::Cite(citation_ref) => {
                        pending_keys.extend(citation_ref.keys());
                        pending_refs.push(&citation_ref.id);
                    }
                    FootEvent::Listing { id, line } => {
                        let count = listings.len() + 1;
                        listings.push(build_listing(
                            docname,
                            Some(id.as_str()),
                            count,
                            &pending_keys,
                            entries,
                            style,
                            config,
                            SourceLocation::new(docname.clone(), *line),
                            diagnostics,
                        ));
                        for ref_id in pending_refs.drain(..) {
                            self.assignments.insert(ref_id.to_string(), count - 1);
                        }
                        pending_keys.clear();
                        last_line = *line;
                    }
                }
            }
            if !pending_refs.is_empty() {
                tracing::debug!(
                    docname = %docname,
                    count = pending_refs.len(),
                    "footnote citations after the last footnote listing"
                );
                let count = listings.len() + 1;
                listings.push(build_listing(
                    docname,
                    None,
                    count,
                    &pending_keys,
                    entries,
                    style,
                    config,
                    SourceLocation::new(docname.clone(), last_line),
                    diagnostics,
                ));
                for ref_id in pending_refs {
                    self.assignments.insert(ref_id.to_string(), count - 1);
                }
            }
            self.listings.insert(docname.clone(), listings);
        }
    }

    /// Declared footnote listings of a document, in document order.
    pub fn listings(&self, docname: &str) -> impl Iterator<Item = &FootListing> {
        self.listings
            .get(docname)
            .into_iter()
            .flatten()
            .filter(|listing| listing.id.is_some())
    }

    pub fn listing(&self, docname: &str, id: &str) -> Option<&FootListing> {
        self.listings(docname)
            .find(|listing| listing.id.as_deref() == Some(id))
    }

    fn footnote(&self, citation_ref: &CitationRef, key: &str) -> Option<&Footnote> {
        let index = *self.assignments.get(&citation_ref.id)?;
        self.listings
            .get(&citation_ref.docname)?
            .get(index)?
            .footnotes
            .iter()
            .find(|footnote| footnote.key == key)
    }

    pub fn render_citation_ref(
        &self,
        citation_ref: &CitationRef,
        style: &dyn ReferenceStyle,
        diagnostics: &mut DiagnosticCollector,
    ) -> Output {
        let location = citation_ref.location();
        let mut references = Vec::with_capacity(citation_ref.targets.len());
        for target in &citation_ref.targets {
            let footnote = self.footnote(citation_ref, &target.key);
            if footnote.is_none() {
                diagnostics.add(key_not_found(&target.key, &location));
            }
            references.push(ReferenceInfo {
                key: &target.key,
                target: footnote.map(|f| ReferenceTarget {
                    entry: &f.entry,
                    label: &f.label,
                    text: &f.text,
                    anchor: &f.id,
                    tooltip: f.tooltip.as_deref(),
                }),
                pre_text: &target.pre_text,
                post_text: &target.post_text,
            });
        }
        render_references(style, &citation_ref.role, &references, Some(location), diagnostics)
    }
}

fn build_listing(
    docname: &str,
    id: Option<&str>,
    count: usize,
    keys: &IndexSet<&str>,
    entries: &IndexMap<String, BibEntry>,
    style: &dyn FormattingStyle,
    config: &BibConfig,
    location: SourceLocation,
    diagnostics: &mut DiagnosticCollector,
) -> FootListing {
    // Unknown keys are reported when their citation renders.
    let found: Vec<BibEntry> = keys
        .iter()
        .filter_map(|key| entries.get(*key).cloned())
        .collect();
    let formatted = style.format_entries(&found, &FormatOptions::default());
    for error in &formatted.errors {
        diagnostics.add(error.to_diagnostic(Some(location.clone())));
    }
    let mut bodies: BTreeMap<String, Output> = formatted
        .entries
        .into_iter()
        .map(|f| (f.key, f.text))
        .collect();

    let footnotes = found
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let text = bodies.remove(&entry.key).unwrap_or(Output::Null);
            let id = expand_id(
                &config.footcite_id,
                &IdContext {
                    key: &entry.key,
                    docname,
                    bibliography_count: 0,
                    footbibliography_count: count,
                },
            );
            Footnote {
                key: entry.key.clone(),
                id,
                label: (i + 1).to_string(),
                tooltip: config.tooltips.then(|| text.to_plain_text()),
                text,
                entry,
            }
        })
        .collect();

    FootListing {
        docname: docname.to_string(),
        id: id.map(str::to_string),
        anchor: expand_id(
            &config.footbibliography_id,
            &IdContext {
                key: "",
                docname,
                bibliography_count: 0,
                footbibliography_count: count,
            },
        ),
        count,
        footnotes,
    }
}
