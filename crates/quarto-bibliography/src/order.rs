//! Document enumeration order.

use std::collections::HashMap;

/// The order in which documents are visited during resolution.
///
/// Documents known to the host come first, in host order; any others follow
/// in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOrder {
    positions: HashMap<String, usize>,
}

impl DocumentOrder {
    pub fn new<I, S>(docnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        for docname in docnames {
            let next = positions.len();
            positions.entry(docname.into()).or_insert(next);
        }
        Self { positions }
    }

    /// Lexical order only.
    pub fn lexical() -> Self {
        Self::default()
    }

    pub fn position(&self, docname: &str) -> Option<usize> {
        self.positions.get(docname).copied()
    }

    /// Sort `docnames` into enumeration order.
    pub fn sort<'a, I>(&self, docnames: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut docnames: Vec<&str> = docnames.into_iter().collect();
        docnames.sort_by(|a, b| {
            let key = |d: &str| self.position(d).unwrap_or(usize::MAX);
            key(a).cmp(&key(b)).then_with(|| a.cmp(b))
        });
        docnames.dedup();
        docnames
    }
}
