/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for filter compilation and evaluation.

use quarto_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use thiserror::Error;

/// Errors from compiling or evaluating a filter expression.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    /// The expression is not well formed.
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },

    /// More than one expression, e.g. `cited; author % "Knuth"`.
    #[error("Filter must be a single expression, found {count}")]
    MultipleExpressions { count: usize },

    /// `a < b < c` style comparisons.
    #[error("Chained comparisons are not supported")]
    ChainedComparison,

    /// A construct outside the filter language (arithmetic, calls, ...).
    #[error("Unsupported expression: {construct}")]
    Unsupported { construct: String },

    /// An operand of `%` that is not a string.
    #[error("Regular expression match requires string operands, found {found}")]
    NonStringRegexOperand { found: &'static str },

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// An operator applied to operands it cannot compare.
    #[error("Operator '{op}' not supported between {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
}

impl FilterError {
    /// Whether the error was found while compiling (as opposed to evaluating).
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, FilterError::Syntax { .. })
    }

    /// Convert this error into a warning about the listing's filter.
    ///
    /// Syntax errors use `Q-20-4`, evaluation errors `Q-20-5`.
    pub fn to_diagnostic(&self, source: &str, location: Option<SourceLocation>) -> DiagnosticMessage {
        let builder = if self.is_syntax_error() {
            DiagnosticMessageBuilder::warning("Invalid Filter Expression").with_code("Q-20-4")
        } else {
            DiagnosticMessageBuilder::warning("Filter Evaluation Error").with_code("Q-20-5")
        };
        builder
            .problem(format!("The bibliography filter `{}` cannot be used", source))
            .add_detail(self.to_string())
            .add_info("Only cited entries are included in this bibliography")
            .with_optional_location(location)
            .build()
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_uses_q_20_4() {
        let err = FilterError::Syntax {
            message: "unexpected end of expression".to_string(),
            offset: 7,
        };
        let diag = err.to_diagnostic("type ==", None);
        assert!(diag.has_code("Q-20-4"));
        assert!(diag.to_text().contains("offset 7"));
    }

    #[test]
    fn test_evaluation_error_uses_q_20_5() {
        let err = FilterError::NonStringRegexOperand { found: "number" };
        let diag = err.to_diagnostic("author % 3", Some(SourceLocation::new("refs", Some(9))));
        assert!(diag.has_code("Q-20-5"));
        assert_eq!(diag.location.unwrap().line, Some(9));
    }
}
