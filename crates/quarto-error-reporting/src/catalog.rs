//! Error code catalog and lookup.
//!
//! This module provides access to the centralized error catalog, which maps
//! error codes (like "Q-20-1") to their metadata (title, message template,
//! docs URL, etc.).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "bibliography")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message template
    pub message_template: String,

    /// URL to documentation (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, loaded lazily from JSON embedded at compile time.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid. This should only happen during
/// development if someone manually edits the catalog incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON - this is a bug in Quarto")
});

/// Look up error code information.
///
/// # Example
///
/// ```
/// use quarto_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("Q-20-6").unwrap();
/// assert_eq!(info.title, "Citation Key Not Found");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get documentation URL for an error code.
pub fn get_docs_url(code: &str) -> Option<&str> {
    ERROR_CATALOG
        .get(code)
        .and_then(|info| info.docs_url.as_deref())
}

/// Get the subsystem name for an error code.
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert_eq!(ERROR_CATALOG.len(), 12);
    }

    #[test]
    fn test_every_code_is_bibliography() {
        for (code, info) in ERROR_CATALOG.iter() {
            assert!(code.starts_with("Q-20-"), "unexpected code {}", code);
            assert_eq!(info.subsystem, "bibliography");
            assert!(info.docs_url.as_deref().unwrap().ends_with(code.as_str()));
        }
    }

    #[test]
    fn test_get_subsystem() {
        assert_eq!(get_subsystem("Q-20-1"), Some("bibliography"));
        assert_eq!(get_subsystem("Q-999-999"), None);
    }

    #[test]
    fn test_nonexistent_code() {
        assert!(get_error_info("Q-999-999").is_none());
        assert!(get_docs_url("Q-999-999").is_none());
    }
}
