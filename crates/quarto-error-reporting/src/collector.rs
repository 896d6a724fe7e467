//! Accumulation of diagnostics over a build.

use crate::diagnostic::{DiagnosticKind, DiagnosticMessage};
use serde::{Deserialize, Serialize};

/// Collector for diagnostic messages.
///
/// Every message added is also emitted through `tracing`, so hosts that only
/// install a subscriber still see the warnings as they happen.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic message.
    pub fn add(&mut self, diagnostic: DiagnosticMessage) {
        let code = diagnostic.code.as_deref().unwrap_or("-");
        let location = diagnostic
            .location
            .as_ref()
            .map(|l| l.to_string())
            .unwrap_or_default();
        let problem = diagnostic
            .problem
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or_default();
        match diagnostic.kind {
            DiagnosticKind::Error => {
                tracing::error!(code = %code, location = %location, "{}: {}", diagnostic.title, problem)
            }
            DiagnosticKind::Warning => {
                tracing::warn!(code = %code, location = %location, "{}: {}", diagnostic.title, problem)
            }
            DiagnosticKind::Info | DiagnosticKind::Note => {
                tracing::info!(code = %code, location = %location, "{}: {}", diagnostic.title, problem)
            }
        }
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic of another collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Check if any errors were collected (warnings don't count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    /// All collected diagnostics carrying `code`.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a DiagnosticMessage> {
        self.diagnostics.iter().filter(move |d| d.has_code(code))
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics
    }

    /// Remove and return everything collected so far.
    pub fn drain(&mut self) -> Vec<DiagnosticMessage> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}
