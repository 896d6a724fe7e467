//! Sort keys for bibliography formatting styles.

use std::cmp::Ordering;

use quarto_bibtex::BibEntry;

/// Author-year-title sort key.
///
/// Persons sort by family then given names; entries without authors fall
/// back to editors, then to the citation key.
pub fn author_year_title_key(entry: &BibEntry) -> Vec<String> {
    let persons = entry
        .persons("author")
        .or_else(|| entry.persons("editor"))
        .map(|persons| {
            persons
                .iter()
                .map(|p| format!("{} {}", p.family_name(), p.given_names()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_else(|| entry.key.clone());
    vec![
        persons,
        entry.plain_field("year").unwrap_or_default(),
        entry.plain_field("title").unwrap_or_default(),
    ]
}

/// Compare two sort keys component by component.
///
/// Empty components sort after non-empty ones.
pub fn compare_sort_keys(a: &[String], b: &[String]) -> Ordering {
    for (ka, kb) in a.iter().zip(b.iter()) {
        let va = normalize_for_sort(ka);
        let vb = normalize_for_sort(kb);
        let cmp = match (va.is_empty(), vb.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => va.cmp(&vb),
        };
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    a.len().cmp(&b.len())
}

fn is_sort_word_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '"' | '\'' | '(' | ')' | '-' | '{' | '}')
}

/// Lowercase, drop punctuation and collapse whitespace.
pub fn normalize_for_sort(s: &str) -> String {
    s.split(is_sort_word_separator)
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
