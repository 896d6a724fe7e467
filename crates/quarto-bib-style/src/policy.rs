//! Bracket and person-name policies shared by the reference styles.

use quarto_bibtex::Person;
use serde::{Deserialize, Serialize};

use crate::output::{Output, Tag, join_outputs_with};

/// How references are bracketed and separated within one citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BracketPolicy {
    pub left: String,
    pub right: String,
    /// Between references of one citation.
    pub sep: String,
    /// Between exactly two references of a textual citation.
    pub sep2: String,
    /// Before the last of three or more references of a textual citation.
    pub last_sep: String,
    /// After pre-text.
    pub pre_sep: String,
    /// Before post-text.
    pub post_sep: String,
}

impl Default for BracketPolicy {
    fn default() -> Self {
        Self {
            left: "[".to_string(),
            right: "]".to_string(),
            sep: ", ".to_string(),
            sep2: " and ".to_string(),
            last_sep: ", and ".to_string(),
            pre_sep: " ".to_string(),
            post_sep: ", ".to_string(),
        }
    }
}

impl BracketPolicy {
    /// Defaults for author-year citations: `(Knuth, 1984; Lamport, 1994)`.
    pub fn round() -> Self {
        Self {
            left: "(".to_string(),
            right: ")".to_string(),
            sep: "; ".to_string(),
            ..Self::default()
        }
    }

    /// No brackets at all, used for superscripts and footnote marks.
    pub fn bare(sep: &str) -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            sep: sep.to_string(),
            ..Self::default()
        }
    }

    /// Apply non-empty fields of `overrides` on top of `self`.
    ///
    /// Used for user configuration, where only a few fields are given.
    pub fn overridden_by(&self, overrides: &BracketOverrides) -> Self {
        let pick = |value: &Option<String>, default: &String| {
            value.clone().unwrap_or_else(|| default.clone())
        };
        Self {
            left: pick(&overrides.left, &self.left),
            right: pick(&overrides.right, &self.right),
            sep: pick(&overrides.sep, &self.sep),
            sep2: pick(&overrides.sep2, &self.sep2),
            last_sep: pick(&overrides.last_sep, &self.last_sep),
            pre_sep: pick(&overrides.pre_sep, &self.pre_sep),
            post_sep: pick(&overrides.post_sep, &self.post_sep),
        }
    }
}

/// Partial bracket policy as given in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BracketOverrides {
    pub left: Option<String>,
    pub right: Option<String>,
    pub sep: Option<String>,
    pub sep2: Option<String>,
    pub last_sep: Option<String>,
    pub pre_sep: Option<String>,
    pub post_sep: Option<String>,
}

impl BracketOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonStyle {
    /// Family name only: `Knuth`.
    #[default]
    Last,
    /// `Donald E. Knuth`, or `D. E. Knuth` when abbreviated.
    FirstLast,
    /// `Knuth, Donald E.`, or `Knuth, D. E.` when abbreviated.
    LastFirst,
}

/// How author lists are rendered inside citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PersonPolicy {
    pub style: PersonStyle,
    pub abbreviate: bool,
    pub sep: String,
    pub sep2: String,
    pub last_sep: String,
    /// Appended when the list is cut short.
    pub other: String,
    /// Lists longer than this are cut to the first name plus `other`,
    /// unless the full list was asked for.
    pub max_names: usize,
}

impl Default for PersonPolicy {
    fn default() -> Self {
        Self {
            style: PersonStyle::Last,
            abbreviate: true,
            sep: ", ".to_string(),
            sep2: " and ".to_string(),
            last_sep: ", and ".to_string(),
            other: " et al.".to_string(),
            max_names: 2,
        }
    }
}

impl PersonPolicy {
    pub fn format_person(&self, person: &Person) -> String {
        let given = if self.abbreviate {
            person.initials()
        } else {
            person.given_names()
        };
        let family = person.family_name();
        let mut name = match self.style {
            PersonStyle::Last => family,
            _ if given.is_empty() => family,
            PersonStyle::FirstLast => format!("{} {}", given, family),
            PersonStyle::LastFirst => format!("{}, {}", family, given),
        };
        if self.style != PersonStyle::Last && !person.lineage_names.is_empty() {
            name.push_str(", ");
            name.push_str(&person.lineage_names.join(" "));
        }
        name
    }

    /// Render a list of persons. `full` disables the `max_names` cutoff.
    ///
    /// A trailing BibTeX `others` always renders as `other`.
    pub fn format_persons(&self, persons: &[Person], full: bool) -> Output {
        let has_others = persons.last().is_some_and(Person::is_others);
        let named = if has_others {
            &persons[..persons.len() - 1]
        } else {
            persons
        };
        if named.is_empty() {
            return Output::Null;
        }

        let truncate = !full && named.len() > self.max_names;
        let shown = if truncate { &named[..1] } else { named };
        let names = shown
            .iter()
            .map(|p| Output::literal(self.format_person(p)))
            .collect::<Vec<_>>();
        let mut list = join_outputs_with(names, &self.sep, &self.sep2, &self.last_sep);
        if truncate || has_others {
            list = Output::sequence(vec![list, Output::literal(self.other.clone())]);
        }
        Output::tagged(Tag::Names, list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quarto_bibtex::BibEntry;

    fn persons(names: &str) -> Vec<Person> {
        BibEntry::new("misc", "x")
            .with_persons("author", names)
            .persons("author")
            .map(<[Person]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn test_person_list_cutoff() {
        let policy = PersonPolicy::default();
        let render = |names: &str, full: bool| policy.format_persons(&persons(names), full).render();

        assert_eq!(render("Donald Knuth", false), "Knuth");
        assert_eq!(render("Donald Knuth and Leslie Lamport", false), "Knuth and Lamport");
        assert_eq!(render("A. Aho and R. Sethi and J. Ullman", false), "Aho et al.");
        assert_eq!(render("A. Aho and R. Sethi and J. Ullman", true), "Aho, Sethi, and Ullman");
        assert_eq!(render("Albert Einstein and others", false), "Einstein et al.");
    }

    #[test]
    fn test_person_styles() {
        let person = Person::parse("Ludwig van Beethoven");
        let mut policy = PersonPolicy::default();
        assert_eq!(policy.format_person(&person), "van Beethoven");
        policy.style = PersonStyle::FirstLast;
        assert_eq!(policy.format_person(&person), "L. van Beethoven");
        policy.style = PersonStyle::LastFirst;
        policy.abbreviate = false;
        assert_eq!(policy.format_person(&person), "van Beethoven, Ludwig");
    }

    #[test]
    fn test_bracket_overrides() {
        let overrides: BracketOverrides =
            serde_json::from_str(r#"{"left": "(", "right": ")", "last-sep": " & "}"#).unwrap();
        let policy = BracketPolicy::default().overridden_by(&overrides);
        assert_eq!(policy.left, "(");
        assert_eq!(policy.last_sep, " & ");
        assert_eq!(policy.sep, ", ");
    }
}
