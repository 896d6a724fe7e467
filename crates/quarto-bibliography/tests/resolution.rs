/*
 * resolution.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end citation resolution over bib files on disk.
 */

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use quarto_bib_style::PluginRegistry;
use quarto_bibliography::{
    BibConfig, CitationDomain, CitationRef, DocumentOrder, InclusionMode, ListShape,
    ListingDeclaration, ListingKey, Selection, Start,
};
use quarto_error_reporting::DiagnosticCollector;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REFS: &str = r#"
@book{A,
  author = {Donald Knuth},
  title = {The TeXbook},
  publisher = {Addison-Wesley},
  year = 1984
}
@article{B,
  author = {Leslie Lamport},
  title = {LaTeX},
  journal = {TUGboat},
  year = 1994
}
@misc{C, author = {Alfred Aho}, title = {Compilers}, year = 1986}
@misc{D, author = {Konrad Zuse}, title = {Z3}, year = 1941}
@article{E, author = {Grace Hopper}, title = {Debugging}, year = 1947}
"#;

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarto_bibliography=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn write_bib(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

struct Project {
    _dir: tempfile::TempDir,
    bib: PathBuf,
}

fn project() -> Project {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let bib = write_bib(dir.path(), "refs.bib", REFS);
    Project { _dir: dir, bib }
}

impl Project {
    fn domain(&self) -> CitationDomain {
        CitationDomain::new(BibConfig::with_bibfiles([&self.bib]), PluginRegistry::new()).unwrap()
    }
}

fn cite(domain: &mut CitationDomain, id: &str, docname: &str, text: &str) -> CitationRef {
    let citation = CitationRef::parse(id, docname, "p", text);
    domain.add_citation_ref(citation.clone());
    citation
}

fn render(domain: &CitationDomain, citation: &CitationRef) -> String {
    let mut diagnostics = DiagnosticCollector::new();
    domain.render_citation_ref(citation, &mut diagnostics).render()
}

fn codes(domain: &CitationDomain, code: &str) -> usize {
    domain.diagnostics().filter(|d| d.has_code(code)).count()
}

#[test]
fn test_cited_first_then_source_order() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "B");
    cite(&mut domain, "c2", "index", "A, C");
    let listing = domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_filter("True")
            .with_style("unsrt"),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    let slot = domain.listing_slot(&listing).unwrap();
    assert_eq!(slot.keys(), vec!["B", "A", "C", "D", "E"]);
    assert_eq!(slot.labels(), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_first_citation_order_follows_document_order() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "zeta", "A");
    cite(&mut domain, "c2", "index", "C");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs").with_style("unsrt"));

    domain.resolve(&DocumentOrder::new(["zeta", "index"]));
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["A", "C"]);

    domain.resolve(&DocumentOrder::lexical());
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["C", "A"]);
}

#[test]
fn test_label_prefix_round_trip() {
    let project = project();
    let mut domain = project.domain();
    let citation = cite(&mut domain, "c1", "index", "B, A, C");
    domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_style("unsrt")
            .with_label_prefix("A"),
    );
    domain.resolve(&DocumentOrder::new(["index"]));
    assert_eq!(render(&domain, &citation), "[A1, A2, A3]");
}

#[test]
fn test_plain_listing_snapshot() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "B, A, C");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let slot = domain.listing_slot(&listing).unwrap();
    insta::assert_snapshot!(slot.render(), @r"
    [1] Alfred Aho. Compilers. 1986.
    [2] Donald Knuth. *The TeXbook*. Addison-Wesley, 1984.
    [3] Leslie Lamport. LaTeX. *TUGboat*, 1994.
    ");
    assert_eq!(slot.anchor, "bibliography-1");
    assert_eq!(slot.items[0].anchor, "cite-index-c");
}

#[test]
fn test_duplicate_key_across_citation_lists() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    let first = domain.add_listing(ListingDeclaration::new("index", "refs"));
    let second = domain.add_listing(
        ListingDeclaration::new("appendix", "more").with_filter("key == \"a\" or key == \"d\""),
    );
    domain.resolve(&DocumentOrder::new(["index", "appendix"]));

    assert_eq!(codes(&domain, "Q-20-3"), 1);
    let a_citations: Vec<&ListingKey> = domain
        .citations()
        .iter()
        .filter(|c| c.key == "A")
        .map(|c| &c.listing)
        .collect();
    assert_eq!(a_citations, vec![&first]);
    assert_eq!(domain.listing_slot(&second).unwrap().keys(), vec!["D"]);
}

#[test]
fn test_bullet_lists_may_repeat_keys() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.add_listing(ListingDeclaration::new("index", "bullets").with_list(ListShape::Bullet));
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(codes(&domain, "Q-20-3"), 0);
    assert_eq!(domain.citations().iter().filter(|c| c.key == "A").count(), 2);
}

#[test]
fn test_duplicate_labels_within_listing() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A, B");
    domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_list(ListShape::Bullet)
            .with_style("constant"),
    );
    domain
        .registry_mut()
        .register(
            quarto_bib_style::PluginGroup::FormattingStyle,
            "constant",
            quarto_bib_style::PluginFactory::formatting_style(|| std::sync::Arc::new(Constant)),
            false,
        )
        .unwrap();
    domain.resolve(&DocumentOrder::new(["index"]));
    assert_eq!(codes(&domain, "Q-20-9"), 1);
}

/// Labels every entry "X".
#[derive(Debug)]
struct Constant;

impl quarto_bib_style::FormattingStyle for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    fn format_entries(
        &self,
        entries: &[quarto_bibtex::BibEntry],
        _options: &quarto_bib_style::FormatOptions,
    ) -> quarto_bib_style::FormattedBibliography {
        quarto_bib_style::FormattedBibliography {
            entries: entries
                .iter()
                .map(|e| quarto_bib_style::FormattedEntry {
                    key: e.key.clone(),
                    label: "X".to_string(),
                    text: quarto_bib_style::Output::literal(e.key.clone()),
                })
                .collect(),
            errors: Vec::new(),
        }
    }
}

#[test]
fn test_filter_error_falls_back_to_cited() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "D");
    let broken = domain.add_listing(ListingDeclaration::new("index", "broken").with_filter("type =="));
    let invalid = domain.add_listing(
        ListingDeclaration::new("index", "invalid")
            .with_list(ListShape::Bullet)
            .with_filter("title % 1984"),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(domain.listing_slot(&broken).unwrap().keys(), vec!["D"]);
    assert_eq!(domain.listing_slot(&invalid).unwrap().keys(), vec!["D"]);
    assert_eq!(codes(&domain, "Q-20-4"), 1);
    assert_eq!(codes(&domain, "Q-20-5"), 1);
}

#[test]
fn test_filter_sees_cited_docnames() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "intro", "A, B");
    cite(&mut domain, "c2", "appendix", "B");
    let listing = domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_filter("\"appendix\" in docnames or type == \"misc\"")
            .with_style("unsrt"),
    );
    domain.resolve(&DocumentOrder::new(["index", "intro", "appendix"]));
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["B", "C", "D"]);
}

#[test]
fn test_key_not_found_marker() {
    let project = project();
    let mut domain = project.domain();
    let citation = cite(&mut domain, "c1", "index", "A, nope");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let mut diagnostics = DiagnosticCollector::new();
    let output = domain.render_citation_ref(&citation, &mut diagnostics);
    assert_eq!(output.render(), "[1, [key not found: nope]]");
    assert_eq!(diagnostics.with_code("Q-20-6").count(), 1);
}

#[test]
fn test_missing_field_degrades_one_entry() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "E, A");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs").with_style("unsrt"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let slot = domain.listing_slot(&listing).unwrap();
    assert_eq!(slot.labels(), vec!["1", "2"]);
    assert_eq!(slot.items[0].text.render(), "[missing field: journal in E]");
    assert!(!slot.items[1].text.has_error());
    assert_eq!(codes(&domain, "Q-20-10"), 1);
}

#[test]
fn test_key_prefix() {
    let project = project();
    let mut domain = project.domain();
    let citation = cite(&mut domain, "c1", "index", "x-A");
    let listing = domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_key_prefix("x-")
            .with_style("alpha"),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["x-A"]);
    assert_eq!(render(&domain, &citation), "[Knu84]");
    // The shared parsed entry keeps its own key.
    assert!(domain.cache().entry("A").is_some());
}

#[test]
fn test_enumerated_continue() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A, B, C");
    let first = domain.add_listing(
        ListingDeclaration::new("index", "one")
            .with_list(ListShape::Enumerated)
            .with_filter("key in {\"a\", \"b\"}")
            .with_style("unsrt"),
    );
    let second = domain.add_listing(
        ListingDeclaration::new("index", "two")
            .with_list(ListShape::Enumerated)
            .with_filter("key == \"c\"")
            .with_start(Start::Continue),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(domain.listing_slot(&first).unwrap().start, 1);
    let second = domain.listing_slot(&second).unwrap();
    assert_eq!(second.start, 3);
    assert_eq!(second.render(), "3. Alfred Aho. Compilers. 1986.");
}

#[test]
fn test_declare_listing_from_options() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    let options: IndexMap<String, String> = [("notcited", ""), ("cited", "")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let listing = domain.declare_listing("index", "refs", Some(4), &[], &options);
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(codes(&domain, "Q-20-7"), 1);
    assert!(!domain.listing_slot(&listing).unwrap().keys().contains(&"A"));
}

#[test]
fn test_unknown_formatting_style_uses_default() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs").with_style("ieee"));
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(codes(&domain, "Q-20-11"), 1);
    assert_eq!(domain.listing_slot(&listing).unwrap().labels(), vec!["1"]);
}

#[test]
fn test_unknown_role_marker() {
    let project = project();
    let mut domain = project.domain();
    let citation = CitationRef::parse("c1", "index", "nonsense", "A");
    domain.add_citation_ref(citation.clone());
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let mut diagnostics = DiagnosticCollector::new();
    let output = domain.render_citation_ref(&citation, &mut diagnostics);
    assert!(output.has_error());
    assert_eq!(diagnostics.with_code("Q-20-11").count(), 1);
}

#[test]
fn test_prefers_citation_list_in_same_document() {
    let project = project();
    let mut domain = project.domain();
    let chapter = cite(&mut domain, "c1", "chapter", "A");
    let index = cite(&mut domain, "c2", "index", "A");
    let reading = domain.add_listing(
        ListingDeclaration::new("index", "reading")
            .with_list(ListShape::Bullet)
            .with_filter("True"),
    );
    let refs = domain.add_listing(ListingDeclaration::new("chapter", "refs"));
    domain.resolve(&DocumentOrder::new(["index", "chapter"]));

    assert_eq!(domain.find_citation("A", "chapter").unwrap().listing, refs);
    assert_eq!(domain.find_citation("A", "index").unwrap().listing, reading);
    assert_eq!(render(&domain, &chapter), "[1]");
    // Aho and Hopper sort before Knuth in the reading list.
    assert_eq!(render(&domain, &index), "[3]");
}

#[test]
fn test_tooltips_in_html() {
    let project = project();
    let mut domain = project.domain();
    let citation = cite(&mut domain, "c1", "index", "C");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let mut diagnostics = DiagnosticCollector::new();
    let html = domain
        .render_citation_ref(&citation, &mut diagnostics)
        .render_html();
    assert_eq!(
        html,
        "[<a href=\"#cite-index-c\" title=\"Alfred Aho. Compilers. 1986.\">1</a>]"
    );
}

#[test]
fn test_purge_removes_document_contributions() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    cite(&mut domain, "c2", "chapter", "D");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs").with_style("unsrt"));
    let order = DocumentOrder::new(["index", "chapter"]);

    domain.resolve(&order);
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["A", "D"]);

    domain.purge_document("chapter");
    domain.resolve(&order);
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["A"]);
    assert!(domain.citations().iter().all(|c| c.key != "D"));

    cite(&mut domain, "c3", "chapter", "D");
    domain.resolve(&order);
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["A", "D"]);
}

#[test]
fn test_merge_is_commutative_and_idempotent() {
    let project = project();
    let mut left = project.domain();
    cite(&mut left, "c1", "index", "B, A");
    left.add_listing(ListingDeclaration::new("index", "refs"));
    let mut right = project.domain();
    cite(&mut right, "c2", "appendix", "C");
    right.add_listing(
        ListingDeclaration::new("appendix", "rest")
            .with_list(ListShape::Bullet)
            .with_filter("not cited"),
    );

    let order = DocumentOrder::new(["index", "appendix"]);
    let mut one = left.clone();
    one.merge(right.clone());
    one.resolve(&order);
    let mut two = right.clone();
    two.merge(left.clone());
    two.resolve(&order);

    assert_eq!(one.citations(), two.citations());
    assert_eq!(one.slots(), two.slots());

    one.merge(right.clone());
    one.resolve(&order);
    assert_eq!(one.citations(), two.citations());
}

#[test]
fn test_merge_replaces_stale_document() {
    let project = project();
    let mut coordinator = project.domain();
    cite(&mut coordinator, "old", "index", "A");
    let listing = coordinator.add_listing(ListingDeclaration::new("index", "refs"));

    let mut worker = project.domain();
    cite(&mut worker, "new", "index", "B");
    worker.add_listing(ListingDeclaration::new("index", "refs"));

    coordinator.merge(worker);
    coordinator.resolve(&DocumentOrder::new(["index"]));
    assert!(coordinator.citation_ref("old").is_none());
    assert_eq!(coordinator.listing_slot(&listing).unwrap().keys(), vec!["B"]);
}

#[test]
fn test_resolve_does_not_reparse_unchanged_files() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    let order = DocumentOrder::new(["index"]);

    domain.resolve(&order);
    let first = domain.citations().to_vec();
    domain.resolve(&order);
    assert_eq!(domain.cache().parse_count(), 1);
    assert_eq!(domain.citations(), first.as_slice());
}

#[test]
fn test_listing_specific_bibfiles() {
    let project = project();
    let extra = write_bib(
        project.bib.parent().unwrap(),
        "extra.bib",
        "@misc{F, author = {Ada Lovelace}, title = {Notes}, year = 1843}",
    );
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "F, A");
    let listing = domain.add_listing(
        ListingDeclaration::new("index", "refs").with_bibfiles([extra.clone()]),
    );
    let mut diagnostics = DiagnosticCollector::new();
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["F"]);
    // A is not in any listing.
    let citation = CitationRef::parse("c2", "index", "p", "A");
    domain.render_citation_ref(&citation, &mut diagnostics);
    assert_eq!(diagnostics.with_code("Q-20-6").count(), 1);
}

#[test]
fn test_serialized_domain_renders_after_round_trip() {
    let project = project();
    let mut domain = project.domain();
    let citation = cite(&mut domain, "c1", "index", "B, A");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    let json = serde_json::to_string(&domain).unwrap();
    let restored: CitationDomain = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.citations(), domain.citations());
    assert_eq!(render(&restored, &citation), "[2, 1]");
}

#[test]
fn test_foot_citations() {
    let project = project();
    let mut domain = project.domain();
    let citation = CitationRef::parse("f1", "index", "p", "B, A");
    domain.add_foot_citation_ref(citation.clone());
    domain.add_foot_listing("index", "notes", Some(30));
    domain.resolve(&DocumentOrder::new(["index"]));

    let listing = domain.foot().listing("index", "notes").unwrap();
    assert_eq!(listing.keys(), vec!["B", "A"]);
    insta::assert_snapshot!(listing.render(), @r"
    [^footcite-b]: Leslie Lamport. LaTeX. *TUGboat*, 1994.
    [^footcite-a]: Donald Knuth. *The TeXbook*. Addison-Wesley, 1984.
    ");

    let mut diagnostics = DiagnosticCollector::new();
    let output = domain.render_foot_citation_ref(&citation, &mut diagnostics);
    assert_eq!(output.render(), "[^footcite-b][^footcite-a]");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_bib_file_is_a_warning() {
    let project = project();
    let config = BibConfig::with_bibfiles([project.bib.clone(), project.bib.with_file_name("gone.bib")]);
    let mut domain = CitationDomain::new(config, PluginRegistry::new()).unwrap();
    cite(&mut domain, "c1", "index", "A");
    let listing = domain.add_listing(ListingDeclaration::new("index", "refs"));
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(codes(&domain, "Q-20-1"), 1);
    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["A"]);
}

#[test]
fn test_all_mode_orders_cited_then_source() {
    let project = project();
    let four = write_bib(
        project.bib.parent().unwrap(),
        "four.bib",
        "@misc{A, title = {a}} @misc{B, title = {b}} @misc{C, title = {c}} @misc{D, title = {d}}",
    );
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "B");
    cite(&mut domain, "c2", "index", "A");
    cite(&mut domain, "c3", "index", "C");
    let listing = domain.add_listing(
        ListingDeclaration::new("index", "refs")
            .with_bibfiles([four])
            .with_selection(Selection::Mode(InclusionMode::All))
            .with_style("unsrt"),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    assert_eq!(domain.listing_slot(&listing).unwrap().keys(), vec!["B", "A", "C", "D"]);
}

#[test]
fn test_merge_of_emptied_document_drops_stale_citations() {
    let project = project();
    let mut coordinator = project.domain();
    cite(&mut coordinator, "c1", "ch1", "D");
    cite(&mut coordinator, "c2", "index", "A");
    let listing = coordinator.add_listing(ListingDeclaration::new("index", "refs"));

    // The worker reprocessed ch1 and found no citations left.
    let mut worker = project.domain();
    worker.purge_document("ch1");

    coordinator.merge(worker);
    coordinator.resolve(&DocumentOrder::new(["index", "ch1"]));

    assert_eq!(coordinator.listing_slot(&listing).unwrap().keys(), vec!["A"]);
    assert!(coordinator.citation_ref("c1").is_none());
    assert!(!coordinator.documents().any(|d| d == "ch1"));
}

#[test]
fn test_bib_warnings_repeat_on_every_resolve() {
    let project = project();
    let dir = project.bib.parent().unwrap();
    let a = write_bib(dir, "a.bib", "@misc{bad, title = }\n@misc{X, title = {From A}}\n");
    let b = write_bib(dir, "b.bib", "@misc{X, title = {From B}}");
    let config = BibConfig::with_bibfiles([a, b]);
    let mut domain = CitationDomain::new(config, PluginRegistry::new()).unwrap();
    cite(&mut domain, "c1", "index", "X");
    domain.add_listing(ListingDeclaration::new("index", "refs"));
    let order = DocumentOrder::new(["index"]);

    let mut counts = Vec::new();
    for _ in 0..2 {
        domain.resolve(&order);
        counts.push((codes(&domain, "Q-20-3"), codes(&domain, "Q-20-2")));
    }
    assert_eq!(counts, vec![(1, 1), (1, 1)]);
    assert_eq!(domain.cache().parse_count(), 2);
}

#[test]
fn test_start_only_numbers_enumerated_lists() {
    let project = project();
    let mut domain = project.domain();
    cite(&mut domain, "c1", "index", "A, B");
    let refs = domain.add_listing(
        ListingDeclaration::new("index", "refs").with_start(Start::At(5)),
    );
    let numbered = domain.add_listing(
        ListingDeclaration::new("index", "numbered")
            .with_list(ListShape::Enumerated)
            .with_start(Start::At(5)),
    );
    domain.resolve(&DocumentOrder::new(["index"]));

    let refs = domain.listing_slot(&refs).unwrap();
    assert_eq!(refs.start, 1);
    assert_eq!(refs.labels(), vec!["1", "2"]);
    let numbered = domain.listing_slot(&numbered).unwrap();
    assert_eq!(numbered.start, 5);
    assert_eq!(numbered.labels(), vec!["5", "6"]);
}
