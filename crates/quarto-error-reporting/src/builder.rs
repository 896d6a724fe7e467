//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse structure: a title, one problem
//! statement, a few details and optional hints.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use crate::location::SourceLocation;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use quarto_error_reporting::DiagnosticMessageBuilder;
///
/// let warning = DiagnosticMessageBuilder::warning("Invalid Filter Expression")
///     .with_code("Q-20-4")
///     .problem("The filter `type ==` could not be parsed")
///     .add_detail("Unexpected end of expression at offset 7")
///     .add_hint("Did you forget the right-hand side of the comparison?")
///     .build();
/// assert_eq!(warning.details.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement (what went wrong).
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error-bulleted detail.
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.add_item(DetailKind::Error, detail)
    }

    /// Add an info-bulleted detail.
    pub fn add_info(self, detail: impl Into<MessageContent>) -> Self {
        self.add_item(DetailKind::Info, detail)
    }

    pub fn add_note(self, detail: impl Into<MessageContent>) -> Self {
        self.add_item(DetailKind::Note, detail)
    }

    fn add_item(mut self, kind: DetailKind, content: impl Into<MessageContent>) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content: content.into(),
        });
        self
    }

    /// Add a hint; hints should end with a question mark.
    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Set the location only when one is known.
    pub fn with_optional_location(mut self, location: Option<SourceLocation>) -> Self {
        self.message.location = location;
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}
