//! Bibliographic entries, BibTeX reading and the bib-source cache.
//!
//! This crate is the bottom layer of Quarto's bibliography processing:
//!
//! - [`BibEntry`] and [`Person`]: the data model every other layer consumes
//! - [`BibParser`] / [`BibtexParser`]: turning source text into entries
//! - [`BibSourceCache`]: re-reading only the files that changed since the
//!   last build
//!
//! # Example
//!
//! ```rust,no_run
//! use quarto_bibtex::BibSourceCache;
//! use quarto_error_reporting::DiagnosticCollector;
//! use std::path::PathBuf;
//!
//! let mut cache = BibSourceCache::new();
//! let mut diagnostics = DiagnosticCollector::new();
//! let entries = cache.ensure(&[PathBuf::from("refs.bib")], "utf-8", &mut diagnostics);
//! for (key, entry) in entries {
//!     println!("{}: {:?}", key, entry.field("title"));
//! }
//! ```

pub mod cache;
pub mod encoding;
pub mod error;
pub mod latex;
pub mod model;
pub mod names;
pub mod parser;

pub use cache::{BibSource, BibSourceCache, Modified, normalize_path};
pub use encoding::Encoding;
pub use error::{BibError, Result};
pub use latex::strip_latex;
pub use model::{BibEntry, Person};
pub use parser::{BibParser, BibtexParser, ParsedBibFile};
