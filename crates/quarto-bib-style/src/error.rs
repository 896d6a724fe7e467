/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for reference and formatting styles.

use quarto_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A template could not be rendered for one entry.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateError {
    #[error("missing field: {field} in {key}")]
    MissingField { field: String, key: String },
}

impl TemplateError {
    pub fn missing(field: impl Into<String>, key: impl Into<String>) -> Self {
        TemplateError::MissingField {
            field: field.into(),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            TemplateError::MissingField { key, .. } => key,
        }
    }

    /// Inline marker shown in place of the entry, e.g.
    /// `[missing field: author in knuth84]`.
    pub fn marker(&self) -> String {
        format!("[{}]", self)
    }

    pub fn to_diagnostic(&self, location: Option<SourceLocation>) -> DiagnosticMessage {
        let TemplateError::MissingField { field, key } = self;
        DiagnosticMessageBuilder::warning("Missing Bibliography Field")
            .with_code("Q-20-10")
            .problem(format!("Entry `{}` has no `{}` field", key, field))
            .add_info("The entry is rendered as an error marker")
            .add_hint(format!("Add a `{}` field to `{}` in its bibliography file", field, key))
            .with_optional_location(location)
            .build()
    }
}

/// Errors from looking up or using styles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StyleError {
    /// The style does not answer this role.
    #[error("Style '{style}' has no role '{role}'")]
    UnknownRole { style: String, role: String },

    /// Nothing is registered under this name.
    #[error("No plugin '{name}' in group '{group}'")]
    PluginNotFound { group: String, name: String },

    /// A factory was registered under a group it does not produce.
    #[error("Plugin '{name}' does not belong in group '{group}'")]
    GroupMismatch { group: String, name: String },
}

impl StyleError {
    pub fn to_diagnostic(&self, location: Option<SourceLocation>) -> DiagnosticMessage {
        let builder = match self {
            StyleError::UnknownRole { .. } => {
                DiagnosticMessageBuilder::warning("Unknown Citation Role")
            }
            StyleError::PluginNotFound { .. } | StyleError::GroupMismatch { .. } => {
                DiagnosticMessageBuilder::warning("Unknown Bibliography Style")
            }
        };
        builder
            .with_code("Q-20-11")
            .problem(self.to_string())
            .with_optional_location(location)
            .build()
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;
