//! The built-in reference styles: `label`, `author_year`, `super` and `foot`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    BasicReferenceStyle, CitationForm, GroupReferenceStyle, ReferenceMark, ReferenceStyle,
    RoleVariants,
};
use crate::policy::{BracketOverrides, BracketPolicy, PersonPolicy};

/// User adjustments applied when a reference style is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReferenceStyleOptions {
    pub bracket: BracketOverrides,
    pub person: Option<PersonPolicy>,
}

const LABEL_ONLY: RoleVariants = RoleVariants {
    capfirst: false,
    full_authors: false,
    unbracketed: true,
};

const BRACKETED: RoleVariants = RoleVariants {
    capfirst: true,
    full_authors: true,
    unbracketed: false,
};

const PLAIN: RoleVariants = RoleVariants {
    capfirst: false,
    full_authors: false,
    unbracketed: false,
};

struct Parts {
    name: &'static str,
    bracket: BracketPolicy,
    person: PersonPolicy,
}

impl Parts {
    fn new(name: &'static str, default_bracket: BracketPolicy, options: &ReferenceStyleOptions) -> Self {
        Self {
            name,
            bracket: default_bracket.overridden_by(&options.bracket),
            person: options.person.clone().unwrap_or_default(),
        }
    }

    fn style(
        &self,
        form: CitationForm,
        mark: ReferenceMark,
        variants: RoleVariants,
    ) -> Arc<dyn ReferenceStyle> {
        Arc::new(BasicReferenceStyle::new(
            self.name,
            form,
            mark,
            variants,
            self.bracket.clone(),
            self.person.clone(),
        ))
    }

    /// Author, label, year and text roles shared by every built-in style.
    fn common(&self, mark: ReferenceMark) -> Vec<Arc<dyn ReferenceStyle>> {
        vec![
            self.style(CitationForm::Author, mark, RoleVariants::ALL),
            self.style(CitationForm::Label, mark, PLAIN),
            self.style(CitationForm::Year, mark, PLAIN),
            self.style(CitationForm::Text, mark, PLAIN),
        ]
    }
}

/// Numeric or alphabetic labels: `[1, 2]`, `Knuth [Knu84]`.
pub fn label_style(options: &ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> {
    let parts = Parts::new("label", BracketPolicy::default(), options);
    let mark = ReferenceMark::Label;
    let mut styles = vec![
        parts.style(CitationForm::Parenthetical, mark, LABEL_ONLY),
        parts.style(CitationForm::Textual, mark, RoleVariants::ALL),
    ];
    styles.extend(parts.common(mark));
    Arc::new(GroupReferenceStyle::new("label", styles))
}

/// Author-year citations: `(Knuth, 1984)`, `Knuth (1984)`.
pub fn author_year_style(options: &ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> {
    let parts = Parts::new("author_year", BracketPolicy::round(), options);
    let mark = ReferenceMark::AuthorYear;
    let mut styles = vec![
        parts.style(CitationForm::Parenthetical, mark, RoleVariants::ALL),
        parts.style(CitationForm::Textual, mark, RoleVariants::ALL),
    ];
    styles.extend(parts.common(mark));
    Arc::new(GroupReferenceStyle::new("author_year", styles))
}

/// Superscript labels: `text^1,2^`, `Knuth^1^`.
pub fn super_style(options: &ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> {
    let parts = Parts::new("super", BracketPolicy::bare(","), options);
    let mark = ReferenceMark::Superscript;
    let mut styles = vec![
        parts.style(CitationForm::Parenthetical, mark, LABEL_ONLY),
        parts.style(CitationForm::Textual, mark, BRACKETED),
    ];
    styles.extend(parts.common(mark));
    Arc::new(GroupReferenceStyle::new("super", styles))
}

/// Footnote references: `text[^footcite-knuth84]`.
pub fn foot_style(options: &ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> {
    let parts = Parts::new("foot", BracketPolicy::bare(""), options);
    let mark = ReferenceMark::Footnote;
    let mut styles = vec![
        parts.style(CitationForm::Parenthetical, mark, PLAIN),
        parts.style(CitationForm::Textual, mark, BRACKETED),
    ];
    styles.extend(parts.common(mark));
    Arc::new(GroupReferenceStyle::new("foot", styles))
}
