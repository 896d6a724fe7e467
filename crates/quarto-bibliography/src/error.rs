/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for citation resolution.

use quarto_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use thiserror::Error;

/// Configuration problems. These abort setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No bibliography files configured")]
    NoBibFiles,

    #[error("Invalid bibliography configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = DiagnosticMessageBuilder::error("Invalid Bibliography Configuration")
            .with_code("Q-20-12")
            .problem(self.to_string());
        match self {
            ConfigError::NoBibFiles => builder
                .add_hint("Set `bibfiles` to the list of your .bib files?")
                .build(),
            ConfigError::Toml(_) => builder.build(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Recoverable problems found while collecting, resolving and rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CitationError {
    #[error("Duplicate citation for key '{key}', already listed in {first_listing}")]
    DuplicateKey { key: String, first_listing: String },

    #[error("Duplicate label '{label}' for keys '{first_key}' and '{key}'")]
    DuplicateLabel {
        label: String,
        first_key: String,
        key: String,
    },

    #[error("Could not find bibliography key '{key}'")]
    KeyNotFound { key: String },

    #[error("Options {options} cannot be combined, using {used}")]
    ConflictingOptions { options: String, used: String },

    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidOption { option: String, value: String },

    #[error("Unknown option '{option}'")]
    UnknownOption { option: String },
}

impl CitationError {
    pub fn code(&self) -> &'static str {
        match self {
            CitationError::DuplicateKey { .. } => "Q-20-3",
            CitationError::KeyNotFound { .. } => "Q-20-6",
            CitationError::ConflictingOptions { .. } => "Q-20-7",
            CitationError::InvalidOption { .. } | CitationError::UnknownOption { .. } => "Q-20-8",
            CitationError::DuplicateLabel { .. } => "Q-20-9",
        }
    }

    pub fn to_diagnostic(&self, location: Option<SourceLocation>) -> DiagnosticMessage {
        let builder = match self {
            CitationError::DuplicateKey { .. } => {
                DiagnosticMessageBuilder::warning("Duplicate Citation")
                    .add_info("The first listing keeps the entry")
            }
            CitationError::DuplicateLabel { .. } => {
                DiagnosticMessageBuilder::warning("Duplicate Label")
                    .add_hint("Use a `labelprefix` to tell the listings apart?")
            }
            CitationError::KeyNotFound { .. } => DiagnosticMessageBuilder::warning("Key Not Found")
                .add_hint("Is the key defined in one of the configured bib files?"),
            CitationError::ConflictingOptions { .. } => {
                DiagnosticMessageBuilder::warning("Conflicting Bibliography Options")
            }
            CitationError::InvalidOption { .. } => {
                DiagnosticMessageBuilder::warning("Invalid Bibliography Option")
                    .add_info("The default value is used")
            }
            CitationError::UnknownOption { .. } => {
                DiagnosticMessageBuilder::warning("Invalid Bibliography Option")
                    .add_info("The option is ignored")
            }
        };
        builder
            .with_code(self.code())
            .problem(self.to_string())
            .with_optional_location(location)
            .build()
    }
}
