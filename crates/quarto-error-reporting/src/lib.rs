//! Error reporting and diagnostic messages for Quarto bibliography processing.
//!
//! Almost every problem the bibliography engine runs into is recoverable: a
//! missing bib file, a bad filter expression, a citation to an unknown key.
//! Those problems are reported as [`DiagnosticMessage`] values rather than
//! propagated as errors, so that one bad listing never stops the rest of a
//! project from rendering.
//!
//! # Structure
//!
//! - [`DiagnosticMessage`]: the message itself (tidyverse-style title,
//!   problem, details and hints)
//! - [`DiagnosticMessageBuilder`]: the preferred way to construct messages
//! - [`DiagnosticCollector`]: accumulates messages during a build
//! - [`catalog`]: the `Q-20-*` error code catalog
//!
//! # Example
//!
//! ```
//! use quarto_error_reporting::{DiagnosticCollector, DiagnosticMessageBuilder, SourceLocation};
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! diagnostics.add(
//!     DiagnosticMessageBuilder::warning("Citation Key Not Found")
//!         .with_code("Q-20-6")
//!         .problem("Key `knuth84` is not defined in any bibliography")
//!         .with_location(SourceLocation::new("intro", Some(12)))
//!         .build(),
//! );
//! assert_eq!(diagnostics.warnings().count(), 1);
//! ```

pub mod builder;
pub mod catalog;
pub mod collector;
pub mod diagnostic;
pub mod location;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info, get_subsystem};
pub use collector::DiagnosticCollector;
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
pub use location::SourceLocation;
