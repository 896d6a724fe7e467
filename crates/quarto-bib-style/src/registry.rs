/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Registry of reference and formatting styles.
 */

//! Plugin registry for styles.
//!
//! Styles are registered as factories under a group and a name. The
//! registry starts out with the built-in styles; hosts may add their own
//! or replace built-ins at runtime.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, StyleError};
use crate::formatting::{BibliographyStyle, FormattingStyle};
use crate::reference::ReferenceStyle;
use crate::reference::builtin::{
    ReferenceStyleOptions, author_year_style, foot_style, label_style, super_style,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginGroup {
    ReferenceStyle,
    FormattingStyle,
}

impl PluginGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginGroup::ReferenceStyle => "reference-style",
            PluginGroup::FormattingStyle => "formatting-style",
        }
    }
}

impl fmt::Display for PluginGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ReferenceStyleFactory =
    Arc<dyn Fn(&ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> + Send + Sync>;
pub type FormattingStyleFactory = Arc<dyn Fn() -> Arc<dyn FormattingStyle> + Send + Sync>;

#[derive(Clone)]
pub enum PluginFactory {
    ReferenceStyle(ReferenceStyleFactory),
    FormattingStyle(FormattingStyleFactory),
}

impl PluginFactory {
    pub fn group(&self) -> PluginGroup {
        match self {
            PluginFactory::ReferenceStyle(_) => PluginGroup::ReferenceStyle,
            PluginFactory::FormattingStyle(_) => PluginGroup::FormattingStyle,
        }
    }

    pub fn reference_style<F>(factory: F) -> Self
    where
        F: Fn(&ReferenceStyleOptions) -> Arc<dyn ReferenceStyle> + Send + Sync + 'static,
    {
        PluginFactory::ReferenceStyle(Arc::new(factory))
    }

    pub fn formatting_style<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn FormattingStyle> + Send + Sync + 'static,
    {
        PluginFactory::FormattingStyle(Arc::new(factory))
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginFactory({})", self.group())
    }
}

/// Registry of style factories keyed by `(group, name)`.
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    plugins: IndexMap<(PluginGroup, String), PluginFactory>,
}

impl PluginRegistry {
    /// A registry holding the built-in styles.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let builtins = [
            ("label", PluginFactory::reference_style(label_style)),
            ("author_year", PluginFactory::reference_style(author_year_style)),
            ("super", PluginFactory::reference_style(super_style)),
            ("foot", PluginFactory::reference_style(foot_style)),
            (
                "plain",
                PluginFactory::formatting_style(|| Arc::new(BibliographyStyle::plain())),
            ),
            (
                "unsrt",
                PluginFactory::formatting_style(|| Arc::new(BibliographyStyle::unsrt())),
            ),
            (
                "alpha",
                PluginFactory::formatting_style(|| Arc::new(BibliographyStyle::alpha())),
            ),
            (
                "unsrtalpha",
                PluginFactory::formatting_style(|| Arc::new(BibliographyStyle::unsrtalpha())),
            ),
        ];
        for (name, factory) in builtins {
            registry
                .plugins
                .insert((factory.group(), name.to_string()), factory);
        }
        registry
    }

    /// Create an empty registry (for testing).
    pub fn empty() -> Self {
        Self {
            plugins: IndexMap::new(),
        }
    }

    /// Register a factory.
    ///
    /// An existing registration is kept unless `overwrite` is set. Returns
    /// whether the factory was stored.
    pub fn register(
        &mut self,
        group: PluginGroup,
        name: &str,
        factory: PluginFactory,
        overwrite: bool,
    ) -> Result<bool> {
        if factory.group() != group {
            return Err(StyleError::GroupMismatch {
                group: group.to_string(),
                name: name.to_string(),
            });
        }
        let key = (group, name.to_string());
        if self.plugins.contains_key(&key) && !overwrite {
            tracing::debug!(group = %group, name, "plugin already registered, keeping existing");
            return Ok(false);
        }
        self.plugins.insert(key, factory);
        Ok(true)
    }

    fn find(&self, group: PluginGroup, name: &str) -> Result<&PluginFactory> {
        self.plugins
            .get(&(group, name.to_string()))
            .ok_or_else(|| StyleError::PluginNotFound {
                group: group.to_string(),
                name: name.to_string(),
            })
    }

    pub fn reference_style(
        &self,
        name: &str,
        options: &ReferenceStyleOptions,
    ) -> Result<Arc<dyn ReferenceStyle>> {
        match self.find(PluginGroup::ReferenceStyle, name)? {
            PluginFactory::ReferenceStyle(factory) => Ok(factory(options)),
            PluginFactory::FormattingStyle(_) => Err(StyleError::GroupMismatch {
                group: PluginGroup::ReferenceStyle.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn formatting_style(&self, name: &str) -> Result<Arc<dyn FormattingStyle>> {
        match self.find(PluginGroup::FormattingStyle, name)? {
            PluginFactory::FormattingStyle(factory) => Ok(factory()),
            PluginFactory::ReferenceStyle(_) => Err(StyleError::GroupMismatch {
                group: PluginGroup::FormattingStyle.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Get a formatting style, falling back to `default` with a warning.
    pub fn formatting_style_or(
        &self,
        name: &str,
        default: &str,
        warnings: &mut Vec<StyleError>,
    ) -> Result<Arc<dyn FormattingStyle>> {
        match self.formatting_style(name) {
            Ok(style) => Ok(style),
            Err(err) => {
                warnings.push(err);
                self.formatting_style(default)
            }
        }
    }

    /// Registered names in a group, in registration order.
    pub fn names(&self, group: PluginGroup) -> Vec<&str> {
        self.plugins
            .keys()
            .filter(|(g, _)| *g == group)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn has_plugin(&self, group: PluginGroup, name: &str) -> bool {
        self.plugins.contains_key(&(group, name.to_string()))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
