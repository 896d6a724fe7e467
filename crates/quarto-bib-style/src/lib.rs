//! Reference styles and bibliography formatting styles.
//!
//! - [`reference`]: how citations render in running text, per role name
//! - [`formatting`]: how listings sort, label and render their entries
//! - [`registry`]: the `(group, name) -> factory` plugin registry
//! - [`output`]: the rich text both produce

pub mod error;
pub mod formatting;
pub mod output;
pub mod policy;
pub mod reference;
pub mod registry;
pub mod template;

pub use error::{Result, StyleError, TemplateError};
pub use formatting::{
    BibliographyStyle, FormatOptions, FormattedBibliography, FormattedEntry, FormattingStyle,
};
pub use output::{Formatting, Output, Tag};
pub use policy::{BracketOverrides, BracketPolicy, PersonPolicy, PersonStyle};
pub use reference::builtin::ReferenceStyleOptions;
pub use reference::{
    BasicReferenceStyle, CitationForm, GroupReferenceStyle, ReferenceInfo, ReferenceMark,
    ReferenceStyle, ReferenceTarget, RenderedCitation,
};
pub use registry::{PluginFactory, PluginGroup, PluginRegistry};
