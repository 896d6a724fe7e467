/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for bibliography source reading.

use quarto_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading bibliography sources.
///
/// None of these abort a build: the cache converts each of them into a
/// warning and carries on with whatever entries it could read.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum BibError {
    /// The file could not be opened or read.
    #[error("Could not read bibliography file '{}': {message}", path.display())]
    SourceUnavailable { path: PathBuf, message: String },

    /// A malformed entry (or `@string`) in a bibliography file.
    #[error("Parse error in '{source_name}' line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    /// The same key defined twice across the configured sources.
    #[error("Duplicate citation key '{key}' in '{}'", path.display())]
    DuplicateKey { key: String, path: PathBuf },

    /// The requested encoding is not supported.
    #[error("Unsupported encoding '{encoding}'")]
    UnknownEncoding { encoding: String },
}

impl BibError {
    /// Convert this error to a DiagnosticMessage.
    ///
    /// Bibliography errors use Q-20-* error codes (subsystem 20).
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            BibError::SourceUnavailable { path, message } => {
                DiagnosticMessageBuilder::warning("Bib File Not Found")
                    .with_code("Q-20-1")
                    .problem(format!(
                        "Bibliography file `{}` could not be read",
                        path.display()
                    ))
                    .add_detail(message.clone())
                    .add_info("The file is treated as empty")
                    .with_location(SourceLocation::document(path.display().to_string()))
                    .build()
            }
            BibError::Parse {
                source_name,
                line,
                message,
            } => DiagnosticMessageBuilder::warning("Bib Parse Error")
                .with_code("Q-20-2")
                .problem(message.clone())
                .add_info("The malformed entry was skipped")
                .with_location(SourceLocation::new(source_name.clone(), Some(*line)))
                .build(),
            BibError::DuplicateKey { key, path } => {
                DiagnosticMessageBuilder::warning("Duplicate Citation Key")
                    .with_code("Q-20-3")
                    .problem(format!("Key `{}` is defined more than once", key))
                    .add_info("The first definition is used")
                    .with_location(SourceLocation::document(path.display().to_string()))
                    .build()
            }
            BibError::UnknownEncoding { encoding } => {
                DiagnosticMessageBuilder::warning("Unsupported Encoding")
                    .with_code("Q-20-2")
                    .problem(format!("Encoding `{}` is not supported", encoding))
                    .add_info("The file is decoded as UTF-8")
                    .add_hint("Use `utf-8` or `latin-1`?")
                    .build()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BibError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_diagnostic() {
        let err = BibError::SourceUnavailable {
            path: PathBuf::from("/tmp/missing.bib"),
            message: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("/tmp/missing.bib"));
        let diag = err.to_diagnostic();
        assert!(diag.has_code("Q-20-1"));
        assert_eq!(diag.location.unwrap().document, "/tmp/missing.bib");
    }

    #[test]
    fn test_parse_error_location() {
        let err = BibError::Parse {
            source_name: "refs.bib".to_string(),
            line: 7,
            message: "expected '='".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error in 'refs.bib' line 7: expected '='"
        );
        assert_eq!(err.to_diagnostic().location.unwrap().line, Some(7));
    }
}
