//! Entry body templates, one per entry type.

use crate::policy::{PersonPolicy, PersonStyle};
use crate::template::{
    Template, field, first_of, italic, join, names, optional, sentence, text, words,
};

/// Full names in natural order, as listed in a bibliography.
pub fn body_person_policy() -> PersonPolicy {
    PersonPolicy {
        style: PersonStyle::FirstLast,
        abbreviate: false,
        max_names: usize::MAX,
        ..PersonPolicy::default()
    }
}

fn authors_or_editors() -> Template {
    first_of(vec![
        names("author"),
        join(", ", vec![names("editor"), text("editor")]),
    ])
}

/// The body template for an entry type; unknown types render as `misc`.
pub fn body_template(entry_type: &str) -> Template {
    match entry_type {
        "article" => words(vec![
            sentence(vec![names("author")]),
            sentence(vec![field("title")]),
            sentence(vec![
                italic(field("journal")),
                optional(field("volume")),
                optional(field("pages")),
                field("year"),
            ]),
        ]),
        "book" => words(vec![
            sentence(vec![authors_or_editors()]),
            sentence(vec![italic(field("title"))]),
            sentence(vec![
                field("publisher"),
                optional(field("address")),
                field("year"),
            ]),
        ]),
        "inproceedings" | "incollection" => words(vec![
            sentence(vec![names("author")]),
            sentence(vec![field("title")]),
            sentence(vec![
                words(vec![text("In"), italic(field("booktitle"))]),
                optional(field("pages")),
                field("year"),
            ]),
        ]),
        "phdthesis" | "mastersthesis" => words(vec![
            sentence(vec![names("author")]),
            sentence(vec![field("title")]),
            sentence(vec![
                text(if entry_type == "phdthesis" {
                    "PhD thesis"
                } else {
                    "Master's thesis"
                }),
                field("school"),
                field("year"),
            ]),
        ]),
        "techreport" => words(vec![
            sentence(vec![names("author")]),
            sentence(vec![field("title")]),
            sentence(vec![
                words(vec![text("Technical Report"), optional(field("number"))]),
                field("institution"),
                field("year"),
            ]),
        ]),
        _ => words(vec![
            optional(sentence(vec![names("author")])),
            optional(sentence(vec![field("title")])),
            optional(sentence(vec![field("howpublished")])),
            optional(sentence(vec![field("year")])),
            optional(sentence(vec![field("note")])),
        ]),
    }
}
