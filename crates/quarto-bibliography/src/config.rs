/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Project-level bibliography configuration.
//!
//! ```toml
//! bibfiles = ["refs.bib", "more.bib"]
//! default-style = "unsrt"
//! reference-style = "author_year"
//!
//! [bracket]
//! left = "("
//! right = ")"
//! ```

use std::path::PathBuf;

use quarto_bib_style::{BracketOverrides, ReferenceStyleOptions};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BibConfig {
    /// Bib files used by listings that do not name their own.
    pub bibfiles: Vec<PathBuf>,
    pub encoding: String,
    /// Formatting style of listings without a `style` option.
    pub default_style: String,
    pub reference_style: String,
    pub foot_reference_style: String,
    /// Anchor of each listed entry.
    pub cite_id: String,
    /// Id of each footnote.
    pub footcite_id: String,
    /// Anchor of each listing.
    pub bibliography_id: String,
    pub footbibliography_id: String,
    /// Attach the entry's plain-text body to each citation link.
    pub tooltips: bool,
    pub bracket: BracketOverrides,
}

impl Default for BibConfig {
    fn default() -> Self {
        Self {
            bibfiles: Vec::new(),
            encoding: "utf-8".to_string(),
            default_style: "plain".to_string(),
            reference_style: "label".to_string(),
            foot_reference_style: "foot".to_string(),
            cite_id: "cite-{docname}-{key}".to_string(),
            footcite_id: "footcite-{key}".to_string(),
            bibliography_id: "bibliography-{bibliography_count}".to_string(),
            footbibliography_id: "footbibliography-{footbibliography_count}".to_string(),
            tooltips: true,
            bracket: BracketOverrides::default(),
        }
    }
}

impl BibConfig {
    pub fn with_bibfiles<I, P>(bibfiles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            bibfiles: bibfiles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bibfiles.is_empty() {
            return Err(ConfigError::NoBibFiles);
        }
        Ok(())
    }

    pub fn reference_style_options(&self) -> ReferenceStyleOptions {
        ReferenceStyleOptions {
            bracket: self.bracket.clone(),
            person: None,
        }
    }
}
