/*
 * model.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliographic entry and person-name types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A structured person name, split the way BibTeX splits names.
///
/// `Ludwig van Beethoven` has first name `Ludwig`, pre-last ("von") part `van`
/// and last name `Beethoven`; `King, Jr, Martin Luther` additionally carries
/// the lineage `Jr` and the middle name `Luther`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub first_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub middle_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prelast_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage_names: Vec<String>,
}

impl Person {
    /// Parse a single BibTeX name (`First von Last`, `von Last, First` or
    /// `von Last, Jr, First`).
    pub fn parse(name: &str) -> Self {
        crate::names::parse_person(name)
    }

    /// A person with only a last name; handy for tests and for `others`.
    pub fn with_last(last: impl Into<String>) -> Self {
        Self {
            last_names: vec![last.into()],
            ..Default::default()
        }
    }

    /// Whether this is the BibTeX `others` marker (`A and others`).
    pub fn is_others(&self) -> bool {
        self.first_names.is_empty()
            && self.prelast_names.is_empty()
            && self.last_names.len() == 1
            && self.last_names[0] == "others"
    }

    /// Family name as shown in citations: pre-last plus last, e.g. `van Beethoven`.
    pub fn family_name(&self) -> String {
        self.prelast_names
            .iter()
            .chain(self.last_names.iter())
            .map(|s| crate::latex::strip_latex(s))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Given names (first plus middle), plain text.
    pub fn given_names(&self) -> String {
        self.first_names
            .iter()
            .chain(self.middle_names.iter())
            .map(|s| crate::latex::strip_latex(s))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Given names abbreviated to initials, e.g. `D. E.`.
    pub fn initials(&self) -> String {
        self.first_names
            .iter()
            .chain(self.middle_names.iter())
            .filter_map(|name| {
                let plain = crate::latex::strip_latex(name);
                plain.chars().next().map(|c| {
                    if plain.contains('-') {
                        plain
                            .split('-')
                            .filter_map(|part| part.chars().next())
                            .map(|c| format!("{}.", c))
                            .collect::<Vec<_>>()
                            .join("-")
                    } else {
                        format!("{}.", c)
                    }
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The name in natural order: `Martin Luther King, Jr`.
    pub fn display_name(&self) -> String {
        let given = self.given_names();
        let family = self.family_name();
        let mut out = match (given.is_empty(), family.is_empty()) {
            (false, false) => format!("{} {}", given, family),
            (true, _) => family,
            (false, true) => given,
        };
        if !self.lineage_names.is_empty() {
            out.push_str(", ");
            out.push_str(&self.lineage_names.join(" "));
        }
        out
    }

    /// BibTeX canonical form: `von Last, Jr, First Middle`.
    ///
    /// Filter expressions match `author` and `editor` against this form.
    pub fn to_bibtex_string(&self) -> String {
        let von_last = self
            .prelast_names
            .iter()
            .chain(self.last_names.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        let jr = self.lineage_names.join(" ");
        let first = self
            .first_names
            .iter()
            .chain(self.middle_names.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        [von_last, jr, first]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One bibliographic record.
///
/// Field names are case-folded to lowercase at parse time. Person lists
/// (`author`, `editor`) are kept apart from the plain fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    /// Citation key, unique within its source file.
    pub key: String,
    /// Entry type, lowercase (`book`, `article`, ...).
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Field name to value, in source order.
    #[serde(default)]
    pub fields: IndexMap<String, String>,
    /// Role (`author`, `editor`) to persons, in source order.
    #[serde(default)]
    pub persons: IndexMap<String, Vec<Person>>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into().to_lowercase(),
            fields: IndexMap::new(),
            persons: IndexMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    /// Builder-style person list setter; `names` is a BibTeX ` and `-separated list.
    pub fn with_persons(mut self, role: &str, names: &str) -> Self {
        self.persons
            .insert(role.to_lowercase(), crate::names::parse_name_list(names));
        self
    }

    /// Field value by (case-insensitive) name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(value) => Some(value.as_str()),
            None => self.fields.get(&name.to_lowercase()).map(String::as_str),
        }
    }

    /// Field value with LaTeX braces and accent commands stripped.
    pub fn plain_field(&self, name: &str) -> Option<String> {
        self.field(name).map(crate::latex::strip_latex)
    }

    /// Person list for a role; `None` when the role is absent or empty.
    pub fn persons(&self, role: &str) -> Option<&[Person]> {
        self.persons
            .get(role)
            .or_else(|| self.persons.get(&role.to_lowercase()))
            .map(Vec::as_slice)
            .filter(|persons| !persons.is_empty())
    }

    /// Copy of this entry under a prefixed key.
    ///
    /// The shared parsed entry is never modified; listings with a key prefix
    /// work on their own copies.
    pub fn with_key_prefix(&self, prefix: &str) -> BibEntry {
        let mut entry = self.clone();
        if !prefix.is_empty() {
            entry.key = format!("{}{}", prefix, self.key);
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        let entry = BibEntry::new("Book", "knuth84").with_field("Title", "The {TeX}book");
        assert_eq!(entry.entry_type, "book");
        assert_eq!(entry.field("title"), Some("The {TeX}book"));
        assert_eq!(entry.field("TITLE"), Some("The {TeX}book"));
        assert_eq!(entry.plain_field("title").as_deref(), Some("The TeXbook"));
        assert_eq!(entry.field("year"), None);
    }

    #[test]
    fn test_with_key_prefix_leaves_original_untouched() {
        let entry = BibEntry::new("book", "knuth84");
        let prefixed = entry.with_key_prefix("a-");
        assert_eq!(prefixed.key, "a-knuth84");
        assert_eq!(entry.key, "knuth84");
        assert_eq!(entry.with_key_prefix("").key, "knuth84");
    }

    #[test]
    fn test_person_string_forms() {
        let person = Person::parse("King, Jr, Martin Luther");
        assert_eq!(person.to_bibtex_string(), "King, Jr, Martin Luther");
        assert_eq!(person.display_name(), "Martin Luther King, Jr");
        assert_eq!(person.initials(), "M. L.");
        assert_eq!(person.family_name(), "King");
    }

    #[test]
    fn test_person_von_part() {
        let person = Person::parse("Ludwig van Beethoven");
        assert_eq!(person.family_name(), "van Beethoven");
        assert_eq!(person.to_bibtex_string(), "van Beethoven, Ludwig");
    }

    #[test]
    fn test_empty_person_list_is_none() {
        let mut entry = BibEntry::new("misc", "x");
        entry.persons.insert("author".to_string(), Vec::new());
        assert!(entry.persons("author").is_none());
    }
}
