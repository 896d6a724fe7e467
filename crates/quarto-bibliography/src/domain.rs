/*
 * domain.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The citation domain: collection, merging, resolution and rendering.
//!
//! A build goes through these steps:
//!
//! 1. Each document's listings and citations are added. Reprocessing a
//!    document starts with [`CitationDomain::purge_document`].
//! 2. Domains built by separate workers for disjoint documents are combined
//!    with [`CitationDomain::merge`].
//! 3. [`CitationDomain::resolve`] reads the bib files and computes every
//!    listing's entries, order, labels and bodies.
//! 4. Listings are rendered from their slots, citations with
//!    [`CitationDomain::render_citation_ref`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use quarto_bib_filter::{Filter, FilterContext};
use quarto_bib_style::{
    FormatOptions, FormattedEntry, FormattingStyle, Output, PluginRegistry, ReferenceInfo,
    ReferenceStyle, ReferenceTarget,
};
use quarto_bibtex::{BibEntry, BibSourceCache};
use quarto_error_reporting::{DiagnosticCollector, DiagnosticMessage, SourceLocation};
use serde::{Deserialize, Serialize};

use crate::citation_ref::CitationRef;
use crate::config::BibConfig;
use crate::error::{CitationError, Result};
use crate::foot::FootCitationDomain;
use crate::ids::{IdContext, expand_id};
use crate::listing::{
    InclusionMode, ListShape, ListingDeclaration, ListingKey, ListingSlot, Selection, SlotItem,
    Start,
};
use crate::order::DocumentOrder;

/// Used when neither the requested nor the configured style exists.
const FALLBACK_FORMATTING_STYLE: &str = "plain";
const FALLBACK_REFERENCE_STYLE: &str = "label";

static NOT_CITED: BTreeSet<String> = BTreeSet::new();

/// One entry as listed in one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub listing: ListingKey,
    pub list: ListShape,
    /// Key with the listing's key prefix applied.
    pub key: String,
    pub anchor: String,
    /// Snapshot of the entry, under the prefixed key.
    pub entry: BibEntry,
    /// Label (with label prefix) and body.
    pub formatted: FormattedEntry,
    pub tooltip: Option<String>,
}

/// Cross-document citation state of a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationDomain {
    config: BibConfig,
    /// Plugins are code and are not shipped between workers. A deserialized
    /// domain starts with the built-in styles.
    #[serde(skip)]
    registry: PluginRegistry,
    cache: BibSourceCache,
    /// Documents with at least one listing or citation.
    documents: BTreeSet<String>,
    /// Documents purged by this domain. On merge they count as owned, so an
    /// emptied document replaces the stale copy on the other side.
    #[serde(default)]
    purged: BTreeSet<String>,
    listings: BTreeMap<String, Vec<ListingDeclaration>>,
    refs: BTreeMap<String, Vec<CitationRef>>,
    foot: FootCitationDomain,
    /// Diagnostics from collecting and merging.
    collected: DiagnosticCollector,

    // Output of the last resolution.
    citations: Vec<Citation>,
    slots: Vec<ListingSlot>,
    resolved: DiagnosticCollector,
}

impl CitationDomain {
    /// Fails when no bib files are configured.
    pub fn new(config: BibConfig, registry: PluginRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            cache: BibSourceCache::new(),
            documents: BTreeSet::new(),
            purged: BTreeSet::new(),
            listings: BTreeMap::new(),
            refs: BTreeMap::new(),
            foot: FootCitationDomain::new(),
            collected: DiagnosticCollector::new(),
            citations: Vec::new(),
            slots: Vec::new(),
            resolved: DiagnosticCollector::new(),
        })
    }

    pub fn config(&self) -> &BibConfig {
        &self.config
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// For registering additional styles.
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    pub fn set_registry(&mut self, registry: PluginRegistry) {
        self.registry = registry;
    }

    pub fn cache(&self) -> &BibSourceCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut BibSourceCache {
        &mut self.cache
    }

    // ---- collecting ----

    /// Record a listing. A listing with the same identity replaces the
    /// earlier one.
    pub fn add_listing(&mut self, declaration: ListingDeclaration) -> ListingKey {
        let key = declaration.key.clone();
        self.documents.insert(key.docname.clone());
        let listings = self.listings.entry(key.docname.clone()).or_default();
        match listings.iter_mut().find(|l| l.key == key) {
            Some(existing) => {
                tracing::debug!(listing = %key, "replacing bibliography listing");
                *existing = declaration;
            }
            None => listings.push(declaration),
        }
        key
    }

    /// Parse directive arguments and options into a listing and record it.
    pub fn declare_listing(
        &mut self,
        docname: &str,
        id: &str,
        line: Option<usize>,
        arguments: &[&str],
        options: &IndexMap<String, String>,
    ) -> ListingKey {
        let declaration = ListingDeclaration::from_options(
            docname,
            id,
            line,
            arguments,
            options,
            &mut self.collected,
        );
        self.add_listing(declaration)
    }

    pub fn add_citation_ref(&mut self, citation_ref: CitationRef) {
        self.documents.insert(citation_ref.docname.clone());
        self.refs
            .entry(citation_ref.docname.clone())
            .or_default()
            .push(citation_ref);
    }

    pub fn add_foot_citation_ref(&mut self, citation_ref: CitationRef) {
        self.documents.insert(citation_ref.docname.clone());
        self.foot.add_citation(citation_ref);
    }

    pub fn add_foot_listing(&mut self, docname: &str, id: &str, line: Option<usize>) {
        self.documents.insert(docname.to_string());
        self.foot.add_listing(docname, id, line);
    }

    /// Forget everything a document contributed.
    ///
    /// The document stays owned by this domain for [`CitationDomain::merge`],
    /// whether or not it contributes again.
    pub fn purge_document(&mut self, docname: &str) {
        tracing::debug!(docname, "purging citations");
        self.documents.remove(docname);
        self.purged.insert(docname.to_string());
        self.listings.remove(docname);
        self.refs.remove(docname);
        self.foot.purge_document(docname);
        self.clear_resolved();
    }

    /// Combine with a domain built for other documents.
    ///
    /// For every document `other` has collected or purged, its copy
    /// replaces ours, even when that copy is empty. Bib source caches are
    /// unioned.
    pub fn merge(&mut self, mut other: CitationDomain) {
        let owned: BTreeSet<String> = other.documents.union(&other.purged).cloned().collect();
        for docname in &owned {
            self.documents.remove(docname);
            self.listings.remove(docname);
            self.refs.remove(docname);
            if let Some(listings) = other.listings.remove(docname) {
                self.listings.insert(docname.clone(), listings);
            }
            if let Some(refs) = other.refs.remove(docname) {
                self.refs.insert(docname.clone(), refs);
            }
        }
        tracing::debug!(documents = owned.len(), "merging citation domain");
        self.foot.merge(other.foot, &owned);
        self.documents.extend(other.documents);
        self.purged.extend(other.purged);
        self.cache.merge(other.cache);
        self.collected.extend(other.collected);
        self.clear_resolved();
    }

    fn clear_resolved(&mut self) {
        self.citations.clear();
        self.slots.clear();
        self.resolved = DiagnosticCollector::new();
        self.foot.clear_resolved();
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(String::as_str)
    }

    /// All declarations, by document name and then declaration order.
    pub fn listings(&self) -> impl Iterator<Item = &ListingDeclaration> {
        self.listings.values().flatten()
    }

    pub fn listing(&self, key: &ListingKey) -> Option<&ListingDeclaration> {
        self.listings.get(&key.docname)?.iter().find(|l| l.key == *key)
    }

    pub fn citation_refs(&self) -> impl Iterator<Item = &CitationRef> {
        self.refs.values().flatten()
    }

    pub fn citation_ref(&self, id: &str) -> Option<&CitationRef> {
        self.citation_refs().find(|r| r.id == id)
    }

    pub fn foot(&self) -> &FootCitationDomain {
        &self.foot
    }

    /// Diagnostics from collecting, merging and the last resolution.
    pub fn diagnostics(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.collected
            .diagnostics()
            .iter()
            .chain(self.resolved.diagnostics())
    }

    pub fn take_diagnostics(&mut self) -> Vec<DiagnosticMessage> {
        let mut all = self.collected.drain();
        all.extend(self.resolved.drain());
        all
    }

    // ---- resolution ----

    /// Compute every listing's citations from scratch.
    pub fn resolve(&mut self, order: &DocumentOrder) {
        self.clear_resolved();
        let mut diagnostics = DiagnosticCollector::new();
        let docnames: Vec<String> = order
            .sort(self.documents.iter().map(String::as_str))
            .into_iter()
            .map(str::to_string)
            .collect();

        // Key to the documents citing it, in first-citation order.
        let mut cited: IndexMap<String, BTreeSet<String>> = IndexMap::new();
        for docname in &docnames {
            for citation_ref in self.refs.get(docname).into_iter().flatten() {
                for key in citation_ref.keys() {
                    cited
                        .entry(key.to_string())
                        .or_default()
                        .insert(docname.clone());
                }
            }
        }

        let mut paths: Vec<PathBuf> = self.config.bibfiles.clone();
        for declaration in self.listings.values().flatten() {
            for path in &declaration.bibfiles {
                if !paths.contains(path) {
                    paths.push(path.clone());
                }
            }
        }
        self.cache
            .ensure(&paths, &self.config.encoding, &mut diagnostics);

        let mut citations = Vec::new();
        let mut slots = Vec::new();
        // Prefixed key to the citation list that holds it.
        let mut listed: HashMap<String, ListingKey> = HashMap::new();
        // Next item number of enumerated lists per document, for
        // `start: continue`.
        let mut next_start: HashMap<&str, usize> = HashMap::new();
        let mut bibliography_count = 0;

        for docname in &docnames {
            for declaration in self.listings.get(docname).into_iter().flatten() {
                bibliography_count += 1;
                let location = declaration.location();

                let candidates = self.candidates(declaration);
                let mut selected = select(declaration, &candidates, &cited, &location, &mut diagnostics);
                // Cited keys in first-citation order, then the rest in
                // source order.
                selected.sort_by_key(|entry| cited.get_index_of(&entry.key).unwrap_or(usize::MAX));

                if declaration.list == ListShape::Citation {
                    selected.retain(|entry| match listed.get(&entry.key) {
                        Some(first) => {
                            diagnostics.add(
                                CitationError::DuplicateKey {
                                    key: entry.key.clone(),
                                    first_listing: first.to_string(),
                                }
                                .to_diagnostic(Some(location.clone())),
                            );
                            false
                        }
                        None => {
                            listed.insert(entry.key.clone(), declaration.key.clone());
                            true
                        }
                    });
                }

                // Only enumerated lists number from `start`.
                let start = match (declaration.list, declaration.start) {
                    (ListShape::Enumerated, Start::At(n)) => n,
                    (ListShape::Enumerated, Start::Continue) => {
                        next_start.get(docname.as_str()).copied().unwrap_or(1)
                    }
                    _ => 1,
                };
                let anchor = expand_id(
                    &self.config.bibliography_id,
                    &IdContext {
                        key: "",
                        docname,
                        bibliography_count,
                        footbibliography_count: 0,
                    },
                );
                let mut slot = ListingSlot {
                    key: declaration.key.clone(),
                    anchor,
                    list: declaration.list,
                    enumtype: declaration.enumtype,
                    start,
                    items: Vec::new(),
                };

                let Some(style) = self.formatting_style(
                    declaration.style.as_deref(),
                    Some(&location),
                    &mut diagnostics,
                ) else {
                    slots.push(slot);
                    continue;
                };
                let formatted = style.format_entries(&selected, &FormatOptions { start });
                if declaration.list == ListShape::Enumerated {
                    next_start.insert(docname.as_str(), start + selected.len());
                }
                for error in &formatted.errors {
                    diagnostics.add(error.to_diagnostic(Some(location.clone())));
                }

                let entries: HashMap<&str, &BibEntry> =
                    selected.iter().map(|e| (e.key.as_str(), e)).collect();
                let mut labels: HashMap<String, String> = HashMap::new();
                for item in formatted.entries {
                    let Some(entry) = entries.get(item.key.as_str()) else {
                        continue;
                    };
                    let label = format!("{}{}", declaration.label_prefix, item.label);
                    match labels.get(&label) {
                        Some(first_key) => diagnostics.add(
                            CitationError::DuplicateLabel {
                                label: label.clone(),
                                first_key: first_key.clone(),
                                key: item.key.clone(),
                            }
                            .to_diagnostic(Some(location.clone())),
                        ),
                        None => {
                            labels.insert(label.clone(), item.key.clone());
                        }
                    }
                    let anchor = expand_id(
                        &self.config.cite_id,
                        &IdContext {
                            key: &item.key,
                            docname,
                            bibliography_count,
                            footbibliography_count: 0,
                        },
                    );
                    slot.items.push(SlotItem {
                        key: item.key.clone(),
                        label: label.clone(),
                        anchor: anchor.clone(),
                        text: item.text.clone(),
                    });
                    citations.push(Citation {
                        listing: declaration.key.clone(),
                        list: declaration.list,
                        key: item.key.clone(),
                        anchor,
                        entry: (*entry).clone(),
                        tooltip: self.config.tooltips.then(|| item.text.to_plain_text()),
                        formatted: FormattedEntry {
                            key: item.key,
                            label,
                            text: item.text,
                        },
                    });
                }
                tracing::debug!(
                    listing = %declaration.key,
                    entries = slot.items.len(),
                    "resolved bibliography listing"
                );
                slots.push(slot);
            }
        }

        if let Some(style) = self.formatting_style(None, None, &mut diagnostics) {
            self.foot
                .resolve(self.cache.entries(), style.as_ref(), &self.config, &mut diagnostics);
        }

        self.citations = citations;
        self.slots = slots;
        self.resolved = diagnostics;
    }

    /// Entries of a listing's bib files (the configured ones if it names
    /// none), in source order, with its key prefix applied.
    fn candidates(&self, declaration: &ListingDeclaration) -> Vec<BibEntry> {
        let paths = if declaration.bibfiles.is_empty() {
            &self.config.bibfiles
        } else {
            &declaration.bibfiles
        };
        let mut seen = HashSet::new();
        paths
            .iter()
            .filter_map(|path| self.cache.source(path))
            .flat_map(|source| source.entries.iter())
            .filter(|entry| seen.insert(entry.key.as_str()))
            .map(|entry| entry.with_key_prefix(&declaration.key_prefix))
            .collect()
    }

    fn formatting_style(
        &self,
        name: Option<&str>,
        location: Option<&SourceLocation>,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Arc<dyn FormattingStyle>> {
        let default = self.config.default_style.as_str();
        let mut warnings = Vec::new();
        let style = match name {
            Some(name) if name != default => {
                self.registry
                    .formatting_style_or(name, default, &mut warnings)
            }
            _ => self.registry.formatting_style(default),
        }
        .or_else(|err| {
            warnings.push(err);
            self.registry.formatting_style(FALLBACK_FORMATTING_STYLE)
        });
        for warning in &warnings {
            diagnostics.add(warning.to_diagnostic(location.cloned()));
        }
        match style {
            Ok(style) => Some(style),
            Err(err) => {
                diagnostics.add(err.to_diagnostic(location.cloned()));
                None
            }
        }
    }

    fn reference_style(
        &self,
        name: &str,
        location: &SourceLocation,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Arc<dyn ReferenceStyle>> {
        let options = self.config.reference_style_options();
        match self.registry.reference_style(name, &options) {
            Ok(style) => Some(style),
            Err(err) => {
                diagnostics.add(err.to_diagnostic(Some(location.clone())));
                self.registry
                    .reference_style(FALLBACK_REFERENCE_STYLE, &options)
                    .ok()
            }
        }
    }

    // ---- output ----

    /// Citations of the last resolution, in resolution order.
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn citation(&self, listing: &ListingKey, key: &str) -> Option<&Citation> {
        self.citations
            .iter()
            .find(|c| c.listing == *listing && c.key == key)
    }

    pub fn slots(&self) -> &[ListingSlot] {
        &self.slots
    }

    pub fn listing_slot(&self, key: &ListingKey) -> Option<&ListingSlot> {
        self.slots.iter().find(|slot| slot.key == *key)
    }

    /// The citation a reference to `key` from `docname` links to: one in a
    /// citation list of the same document if there is one, otherwise the
    /// first in resolution order.
    pub fn find_citation(&self, key: &str, docname: &str) -> Option<&Citation> {
        self.citations
            .iter()
            .find(|c| c.key == key && c.list == ListShape::Citation && c.listing.docname == docname)
            .or_else(|| self.citations.iter().find(|c| c.key == key))
    }

    pub fn render_citation_ref(
        &self,
        citation_ref: &CitationRef,
        diagnostics: &mut DiagnosticCollector,
    ) -> Output {
        let location = citation_ref.location();
        let name = &self.config.reference_style;
        let Some(style) = self.reference_style(name, &location, diagnostics) else {
            return Output::error(format!("unknown reference style: {}", name));
        };

        let mut references = Vec::with_capacity(citation_ref.targets.len());
        for target in &citation_ref.targets {
            let citation = self.find_citation(&target.key, &citation_ref.docname);
            if citation.is_none() {
                diagnostics.add(key_not_found(&target.key, &location));
            }
            references.push(ReferenceInfo {
                key: &target.key,
                target: citation.map(|c| ReferenceTarget {
                    entry: &c.entry,
                    label: &c.formatted.label,
                    text: &c.formatted.text,
                    anchor: &c.anchor,
                    tooltip: c.tooltip.as_deref(),
                }),
                pre_text: &target.pre_text,
                post_text: &target.post_text,
            });
        }
        render_references(
            style.as_ref(),
            &citation_ref.role,
            &references,
            Some(location),
            diagnostics,
        )
    }

    /// Render a recorded citation by id.
    pub fn render_citation(
        &self,
        id: &str,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Output> {
        let citation_ref = self.citation_ref(id)?;
        Some(self.render_citation_ref(citation_ref, diagnostics))
    }

    pub fn render_foot_citation_ref(
        &self,
        citation_ref: &CitationRef,
        diagnostics: &mut DiagnosticCollector,
    ) -> Output {
        let location = citation_ref.location();
        let name = &self.config.foot_reference_style;
        match self.reference_style(name, &location, diagnostics) {
            Some(style) => self
                .foot
                .render_citation_ref(citation_ref, style.as_ref(), diagnostics),
            None => Output::error(format!("unknown reference style: {}", name)),
        }
    }
}

/// Entries of a listing that pass its selection, in candidate order.
///
/// A filter that fails to compile or evaluate is reported once and the
/// listing falls back to its cited entries.
fn select(
    declaration: &ListingDeclaration,
    candidates: &[BibEntry],
    cited: &IndexMap<String, BTreeSet<String>>,
    location: &SourceLocation,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<BibEntry> {
    let is_cited = |entry: &&BibEntry| cited.contains_key(&entry.key);
    let picked: Vec<&BibEntry> = match &declaration.selection {
        Selection::Mode(InclusionMode::Cited) => candidates.iter().filter(is_cited).collect(),
        Selection::Mode(InclusionMode::NotCited) => {
            candidates.iter().filter(|e| !is_cited(e)).collect()
        }
        Selection::Mode(InclusionMode::All) => candidates.iter().collect(),
        Selection::Filter(source) => {
            let outcome = Filter::compile(source).and_then(|filter| {
                candidates
                    .iter()
                    .map(|entry| {
                        let ctx = FilterContext {
                            entry,
                            docname: &declaration.key.docname,
                            cited_docnames: cited.get(&entry.key).unwrap_or(&NOT_CITED),
                        };
                        filter.evaluate(&ctx).map(|keep| keep.then_some(entry))
                    })
                    .collect::<quarto_bib_filter::Result<Vec<_>>>()
            });
            match outcome {
                Ok(picked) => picked.into_iter().flatten().collect(),
                Err(err) => {
                    diagnostics.add(err.to_diagnostic(source, Some(location.clone())));
                    candidates.iter().filter(is_cited).collect()
                }
            }
        }
    };
    picked.into_iter().cloned().collect()
}

pub(crate) fn key_not_found(key: &str, location: &SourceLocation) -> DiagnosticMessage {
    CitationError::KeyNotFound {
        key: key.to_string(),
    }
    .to_diagnostic(Some(location.clone()))
}

/// Render with a reference style, reporting unknown roles and missing fields.
pub(crate) fn render_references(
    style: &dyn ReferenceStyle,
    role: &str,
    references: &[ReferenceInfo<'_>],
    location: Option<SourceLocation>,
    diagnostics: &mut DiagnosticCollector,
) -> Output {
    match style.render(role, references) {
        Ok(rendered) => {
            for error in &rendered.errors {
                diagnostics.add(error.to_diagnostic(location.clone()));
            }
            rendered.output
        }
        Err(err) => {
            diagnostics.add(err.to_diagnostic(location));
            Output::error(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BibConfig;
    use crate::error::ConfigError;

    fn domain() -> CitationDomain {
        CitationDomain::new(
            BibConfig::with_bibfiles(["refs.bib"]),
            PluginRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_requires_bibfiles() {
        let result = CitationDomain::new(BibConfig::default(), PluginRegistry::new());
        assert!(matches!(result, Err(ConfigError::NoBibFiles)));
    }

    #[test]
    fn test_add_listing_replaces_same_identity() {
        let mut domain = domain();
        domain.add_listing(ListingDeclaration::new("intro", "refs"));
        domain.add_listing(ListingDeclaration::new("intro", "refs").with_list(ListShape::Bullet));
        let listings: Vec<_> = domain.listings().collect();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].list, ListShape::Bullet);
    }

    #[test]
    fn test_purge_forgets_document() {
        let mut domain = domain();
        domain.add_listing(ListingDeclaration::new("intro", "refs"));
        domain.add_citation_ref(CitationRef::parse("r1", "intro", "p", "knuth84"));
        domain.add_citation_ref(CitationRef::parse("r2", "other", "p", "knuth84"));
        domain.purge_document("intro");
        assert_eq!(domain.documents().collect::<Vec<_>>(), vec!["other"]);
        assert_eq!(domain.listings().count(), 0);
        assert!(domain.citation_ref("r1").is_none());
        assert!(domain.citation_ref("r2").is_some());
    }

    #[test]
    fn test_merge_takes_over_purged_documents() {
        let mut coordinator = domain();
        coordinator.add_citation_ref(CitationRef::parse("r1", "ch1", "p", "knuth84"));
        coordinator.add_citation_ref(CitationRef::parse("r2", "index", "p", "lamport94"));

        let mut worker = domain();
        worker.purge_document("ch1");
        coordinator.merge(worker);

        assert_eq!(coordinator.documents().collect::<Vec<_>>(), vec!["index"]);
        assert!(coordinator.citation_ref("r1").is_none());
        assert!(coordinator.citation_ref("r2").is_some());
    }

    #[test]
    fn test_select_modes() {
        let candidates = vec![BibEntry::new("misc", "a"), BibEntry::new("misc", "b")];
        let mut cited = IndexMap::new();
        cited.insert("b".to_string(), BTreeSet::from(["intro".to_string()]));
        let location = SourceLocation::document("intro");
        let mut diagnostics = DiagnosticCollector::new();
        let keys = |selection: Selection, diagnostics: &mut DiagnosticCollector| {
            let decl = ListingDeclaration::new("intro", "refs").with_selection(selection);
            select(&decl, &candidates, &cited, &location, diagnostics)
                .into_iter()
                .map(|e| e.key)
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(Selection::Mode(InclusionMode::Cited), &mut diagnostics), vec!["b"]);
        assert_eq!(keys(Selection::Mode(InclusionMode::NotCited), &mut diagnostics), vec!["a"]);
        assert_eq!(keys(Selection::Mode(InclusionMode::All), &mut diagnostics), vec!["a", "b"]);
        assert_eq!(
            keys(Selection::Filter("key == \"a\"".to_string()), &mut diagnostics),
            vec!["a"]
        );
        assert!(diagnostics.is_empty());

        assert_eq!(keys(Selection::Filter("key ==".to_string()), &mut diagnostics), vec!["b"]);
        assert_eq!(diagnostics.with_code("Q-20-4").count(), 1);
        assert_eq!(
            keys(Selection::Filter("key % 3".to_string()), &mut diagnostics),
            vec!["b"]
        );
        assert_eq!(diagnostics.with_code("Q-20-5").count(), 1);
    }
}
