//! Source locations for diagnostics.
//!
//! Bibliography diagnostics point either at a document of the project (a
//! listing directive, a citation role) or at a bib source file. Both are
//! identified by name plus an optional 1-based line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a diagnostic originated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Document name or file path.
    pub document: String,
    /// 1-based line number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl SourceLocation {
    pub fn new(document: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            document: document.into(),
            line,
        }
    }

    /// A location covering a whole document or file.
    pub fn document(document: impl Into<String>) -> Self {
        Self::new(document, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.document, line),
            None => write!(f, "{}", self.document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line() {
        assert_eq!(SourceLocation::new("intro", Some(3)).to_string(), "intro:3");
    }

    #[test]
    fn test_display_without_line() {
        assert_eq!(SourceLocation::document("refs.bib").to_string(), "refs.bib");
    }
}
