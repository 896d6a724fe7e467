//! Label assignment for bibliography formatting styles.

use std::collections::HashMap;

use quarto_bibtex::{BibEntry, Person, strip_latex};

/// Labels `start`, `start + 1`, ...
pub fn numeric_labels(count: usize, start: usize) -> Vec<String> {
    (0..count).map(|i| (start + i).to_string()).collect()
}

/// Alphabetic labels such as `Knu84`, `KP09` and `Ein+05`.
///
/// Labels that collide get `a`, `b`, ... suffixes in entry order.
pub fn alpha_labels(entries: &[BibEntry]) -> Vec<String> {
    let labels: Vec<String> = entries.iter().map(alpha_label).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in &labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            if counts[label.as_str()] > 1 {
                let index = seen.entry(label.as_str()).or_default();
                let suffix = suffix_for(*index);
                *index += 1;
                format!("{}{}", label, suffix)
            } else {
                label.clone()
            }
        })
        .collect()
}

/// `a`..`z`, then `aa`, `ab`, ...
fn suffix_for(index: usize) -> String {
    let letter = |i: usize| char::from(b'a' + (i % 26) as u8);
    if index < 26 {
        letter(index).to_string()
    } else {
        format!("{}{}", letter(index / 26 - 1), letter(index))
    }
}

fn alnum(s: &str) -> String {
    strip_latex(s).chars().filter(|c| c.is_alphanumeric()).collect()
}

fn von_initials(person: &Person) -> String {
    person
        .prelast_names
        .iter()
        .filter_map(|w| alnum(w).chars().next())
        .collect()
}

fn last_name(person: &Person) -> String {
    alnum(&person.last_names.join(""))
}

fn persons_part(persons: &[Person]) -> String {
    let has_others = persons.last().is_some_and(Person::is_others);
    let named = if has_others {
        &persons[..persons.len() - 1]
    } else {
        persons
    };

    let mut part = match named.len() {
        0 => String::new(),
        1 => {
            let person = &named[0];
            let mut out = von_initials(person);
            out.extend(last_name(person).chars().take(3));
            out
        }
        n => named
            .iter()
            .take(if n > 4 { 3 } else { n })
            .map(|p| {
                let mut out = von_initials(p);
                out.extend(last_name(p).chars().take(1));
                out
            })
            .collect(),
    };
    if has_others || named.len() > 4 {
        part.push('+');
    }
    part
}

fn alpha_label(entry: &BibEntry) -> String {
    let names = entry
        .persons("author")
        .or_else(|| entry.persons("editor"))
        .map(persons_part)
        .filter(|part| !part.is_empty())
        .unwrap_or_else(|| alnum(&entry.key).chars().take(3).collect());
    let year: String = entry
        .plain_field("year")
        .map(|year| {
            let digits: Vec<char> = year.chars().filter(char::is_ascii_digit).collect();
            digits[digits.len().saturating_sub(2)..].iter().collect()
        })
        .unwrap_or_default();
    format!("{}{}", names, year)
}
