/*
 * roles.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendering citation roles of the built-in reference styles.
 */

use quarto_bib_style::{
    Output, PluginRegistry, ReferenceInfo, ReferenceStyleOptions, ReferenceTarget,
    RenderedCitation, StyleError, TemplateError,
};
use quarto_bibtex::BibEntry;

struct Fixture {
    entry: BibEntry,
    label: String,
    anchor: String,
    text: Output,
}

fn fixture(key: &str, authors: &str, year: &str, label: &str) -> Fixture {
    let mut entry = BibEntry::new("article", key).with_field("year", year);
    if !authors.is_empty() {
        entry = entry.with_persons("author", authors);
    }
    Fixture {
        entry,
        label: label.to_string(),
        anchor: format!("cite-index-{}", key),
        text: Output::literal(format!("Body of {}.", key)),
    }
}

fn refs<'a>(fixtures: &'a [Fixture]) -> Vec<ReferenceInfo<'a>> {
    fixtures
        .iter()
        .map(|f| ReferenceInfo {
            key: &f.entry.key,
            target: Some(ReferenceTarget {
                entry: &f.entry,
                label: &f.label,
                text: &f.text,
                anchor: &f.anchor,
                tooltip: None,
            }),
            pre_text: "",
            post_text: "",
        })
        .collect()
}

fn render(style: &str, role: &str, references: &[ReferenceInfo<'_>]) -> RenderedCitation {
    PluginRegistry::new()
        .reference_style(style, &ReferenceStyleOptions::default())
        .unwrap()
        .render(role, references)
        .unwrap()
}

fn three() -> Vec<Fixture> {
    vec![
        fixture("a1", "Donald Knuth", "1984", "A1"),
        fixture("a2", "Leslie Lamport and Donald Knuth", "1994", "A2"),
        fixture("a3", "Alfred Aho and Ravi Sethi and Jeffrey Ullman", "1986", "A3"),
    ]
}

#[test]
fn test_label_p_renders_bracketed_labels() {
    let fixtures = three();
    let rendered = render("label", "p", &refs(&fixtures));
    assert_eq!(rendered.output.render(), "[A1, A2, A3]");
    assert!(rendered.errors.is_empty());
}

#[test]
fn test_label_roles() {
    let fixtures = three();
    let references = refs(&fixtures);
    let cases = [
        ("alp", "A1, A2, A3"),
        ("t", "Knuth [A1], Lamport and Knuth [A2], and Aho et al. [A3]"),
        ("ts", "Knuth [A1], Lamport and Knuth [A2], and Aho, Sethi, and Ullman [A3]"),
        ("alt", "Knuth A1, Lamport and Knuth A2, and Aho et al. A3"),
        ("author", "Knuth, Lamport and Knuth, and Aho et al."),
        ("label", "A1, A2, A3"),
        ("labelpar", "[A1, A2, A3]"),
        ("year", "1984, 1994, 1986"),
        ("yearpar", "[1984, 1994, 1986]"),
        ("text", "Body of a1. Body of a2. Body of a3."),
    ];
    for (role, expected) in cases {
        assert_eq!(
            render("label", role, &references).output.render(),
            expected,
            "role {}",
            role
        );
    }
}

#[test]
fn test_author_year_roles() {
    let fixtures = vec![
        fixture("knuth84", "Donald Knuth", "1984", "1"),
        fixture("beethoven", "Ludwig van Beethoven", "1801", "2"),
    ];
    let references = refs(&fixtures);
    insta::assert_snapshot!(
        render("author_year", "p", &references).output.render(),
        @"(Knuth, 1984; van Beethoven, 1801)"
    );
    insta::assert_snapshot!(
        render("author_year", "ct", &references[1..]).output.render(),
        @"Van Beethoven (1801)"
    );
    insta::assert_snapshot!(
        render("author_year", "calp", &references[1..]).output.render(),
        @"Van Beethoven, 1801"
    );
}

#[test]
fn test_pre_and_post_text() {
    let fixtures = vec![fixture("knuth84", "Donald Knuth", "1984", "1")];
    let mut references = refs(&fixtures);
    references[0].pre_text = "see";
    references[0].post_text = "p. 5";
    assert_eq!(render("label", "p", &references).output.render(), "[see 1, p. 5]");
    assert_eq!(
        render("author_year", "t", &references).output.render(),
        "see Knuth (1984, p. 5)"
    );
}

#[test]
fn test_super_and_foot_styles() {
    let fixtures = vec![
        fixture("knuth84", "Donald Knuth", "1984", "1"),
        fixture("aho86", "Alfred Aho", "1986", "2"),
    ];
    let references = refs(&fixtures);
    assert_eq!(render("super", "p", &references).output.render(), "^1,2^");
    assert_eq!(render("super", "t", &references[..1]).output.render(), "Knuth^1^");
    assert_eq!(
        render("foot", "p", &references).output.render(),
        "[^cite-index-knuth84][^cite-index-aho86]"
    );
    assert_eq!(
        render("foot", "t", &references[..1]).output.render(),
        "Knuth[^cite-index-knuth84]"
    );
}

#[test]
fn test_missing_field_marks_only_that_reference() {
    let fixtures = vec![
        fixture("knuth84", "Donald Knuth", "1984", "1"),
        fixture("anon", "", "2000", "2"),
    ];
    let rendered = render("label", "t", &refs(&fixtures));
    assert_eq!(
        rendered.output.render(),
        "Knuth [1] and [missing field: author in anon]"
    );
    assert_eq!(rendered.errors, vec![TemplateError::missing("author", "anon")]);
}

#[test]
fn test_unresolved_key_marker() {
    let fixtures = vec![fixture("knuth84", "Donald Knuth", "1984", "1")];
    let mut references = refs(&fixtures);
    references.push(ReferenceInfo {
        key: "nope",
        target: None,
        pre_text: "",
        post_text: "",
    });
    assert_eq!(
        render("label", "p", &references).output.render(),
        "[1, [key not found: nope]]"
    );
}

#[test]
fn test_unknown_role_is_typed_error() {
    let style = PluginRegistry::new()
        .reference_style("super", &ReferenceStyleOptions::default())
        .unwrap();
    assert_eq!(
        style.render("ps", &[]).unwrap_err(),
        StyleError::UnknownRole {
            style: "super".to_string(),
            role: "ps".to_string()
        }
    );
}

#[test]
fn test_tooltips_and_links_in_html() {
    let fixtures = vec![fixture("knuth84", "Donald Knuth", "1984", "1")];
    let mut references = refs(&fixtures);
    if let Some(target) = references[0].target.as_mut() {
        target.tooltip = Some("Body of knuth84.");
    }
    assert_eq!(
        render("label", "p", &references).output.render_html(),
        "[<a href=\"#cite-index-knuth84\" title=\"Body of knuth84.\">1</a>]"
    );
}
