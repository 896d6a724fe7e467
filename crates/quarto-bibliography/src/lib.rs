//! Citation resolution across the documents of a project.
//!
//! Documents declare bibliography listings and cite keys; this crate turns
//! them into one consistent set of labeled, ordered and formatted citations.
//!
//! ```rust,no_run
//! use quarto_bibliography::{
//!     BibConfig, CitationDomain, CitationRef, DocumentOrder, ListingDeclaration,
//! };
//! use quarto_bib_style::PluginRegistry;
//! use quarto_error_reporting::DiagnosticCollector;
//!
//! let config = BibConfig::with_bibfiles(["refs.bib"]);
//! let mut domain = CitationDomain::new(config, PluginRegistry::new())?;
//! domain.add_citation_ref(CitationRef::parse("c1", "index", "p", "knuth84"));
//! let listing = domain.add_listing(ListingDeclaration::new("index", "refs"));
//! domain.resolve(&DocumentOrder::new(["index"]));
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! if let Some(output) = domain.render_citation("c1", &mut diagnostics) {
//!     println!("{}", output.render());
//! }
//! if let Some(slot) = domain.listing_slot(&listing) {
//!     println!("{}", slot.render());
//! }
//! # Ok::<(), quarto_bibliography::ConfigError>(())
//! ```

pub mod citation_ref;
pub mod config;
pub mod domain;
pub mod error;
pub mod foot;
pub mod ids;
pub mod listing;
pub mod order;

pub use citation_ref::{CitationRef, CitationTarget};
pub use config::BibConfig;
pub use domain::{Citation, CitationDomain};
pub use error::{CitationError, ConfigError, Result};
pub use foot::{FootCitationDomain, FootEvent, FootListing, Footnote};
pub use ids::{IdContext, expand_id, sanitize_id};
pub use listing::{
    EnumType, InclusionMode, ListShape, ListingDeclaration, ListingKey, ListingSlot, Selection,
    SlotItem, Start,
};
pub use order::DocumentOrder;
