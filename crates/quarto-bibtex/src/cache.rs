/*
 * cache.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Staleness-aware cache of parsed bibliography sources.
//!
//! Re-reading every bib file on every incremental build is the dominant cost
//! of citation processing in large projects. [`BibSourceCache`] remembers,
//! per file, the modification time and encoding it was read with. A call to
//! [`BibSourceCache::ensure`] only `stat`s unchanged files and re-parses the
//! ones whose timestamp or encoding changed.
//!
//! The merged key map is rebuilt from the per-file entries (no re-parsing)
//! whenever any file changed or the declared file list changed. Files are
//! merged in declared order and the first definition of a key wins.
//!
//! Parse errors are kept with their source and duplicate keys with the merged
//! map, so every `ensure` reports the current problems of the declared files
//! whether or not anything was re-read.

use crate::encoding::Encoding;
use crate::error::BibError;
use crate::model::BibEntry;
use crate::parser::{BibParser, BibtexParser};
use indexmap::IndexMap;
use quarto_error_reporting::DiagnosticCollector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Last observed state of a source file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modified {
    /// The file's modification time when it was last read.
    At(SystemTime),
    /// The file could not be opened. Never matches a real timestamp, so the
    /// file is retried on every call.
    Unavailable,
}

/// One bibliography source file and the entries it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibSource {
    pub path: PathBuf,
    pub modified: Modified,
    /// Name of the encoding the file was decoded with.
    pub encoding: String,
    /// Entries in file order.
    pub entries: Vec<BibEntry>,
    /// Entries skipped while parsing.
    #[serde(default)]
    pub errors: Vec<BibError>,
}

impl BibSource {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    fn is_fresh(&self, current: Option<SystemTime>, encoding: &str) -> bool {
        match (self.modified, current) {
            (Modified::At(cached), Some(current)) => cached == current && self.encoding == encoding,
            _ => false,
        }
    }
}

fn default_parser() -> Arc<dyn BibParser> {
    Arc::new(BibtexParser)
}

/// Cache of parsed bibliography files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibSourceCache {
    /// Per-file state, keyed by normalized path.
    sources: IndexMap<PathBuf, BibSource>,
    /// File list of the last `ensure` call, in declared order.
    declared: Vec<PathBuf>,
    /// Encoding of the last `ensure` call.
    encoding: String,
    /// Merged entries of the declared files.
    entries: IndexMap<String, BibEntry>,
    /// Path that contributed each merged key.
    origins: IndexMap<String, PathBuf>,
    /// Keys shadowed by an earlier declared file.
    #[serde(default)]
    duplicates: Vec<BibError>,
    #[serde(skip)]
    parse_count: usize,
    #[serde(skip, default = "default_parser")]
    parser: Arc<dyn BibParser>,
}

impl Default for BibSourceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute form of a path, without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl BibSourceCache {
    /// An empty cache using the BibTeX reader.
    pub fn new() -> Self {
        Self::with_parser(default_parser())
    }

    /// An empty cache using a custom reader.
    pub fn with_parser(parser: Arc<dyn BibParser>) -> Self {
        Self {
            sources: IndexMap::new(),
            declared: Vec::new(),
            encoding: String::new(),
            entries: IndexMap::new(),
            origins: IndexMap::new(),
            duplicates: Vec::new(),
            parse_count: 0,
            parser,
        }
    }

    /// Replace the reader, e.g. after deserializing a cache shipped from
    /// another process.
    pub fn set_parser(&mut self, parser: Arc<dyn BibParser>) {
        self.parser = parser;
    }

    /// Bring the cache up to date with `paths` and return the merged entries.
    ///
    /// Unchanged files cost one `stat`. Unreadable files contribute nothing
    /// and produce a `Q-20-1` warning; they are retried on the next call.
    /// Parse errors (`Q-20-2`) and duplicate keys (`Q-20-3`) are reported on
    /// every call, including calls that re-read nothing.
    pub fn ensure(
        &mut self,
        paths: &[PathBuf],
        encoding: &str,
        diagnostics: &mut DiagnosticCollector,
    ) -> &IndexMap<String, BibEntry> {
        let declared: Vec<PathBuf> = paths.iter().map(|p| normalize_path(p)).collect();
        let mut changed = declared != self.declared || encoding != self.encoding;

        let decoder = match Encoding::from_name(encoding) {
            Ok(decoder) => decoder,
            Err(err) => {
                diagnostics.add(err.to_diagnostic());
                Encoding::Utf8
            }
        };

        for path in &declared {
            let current = modification_time(path);
            if self
                .sources
                .get(path)
                .is_some_and(|source| source.is_fresh(current, encoding))
            {
                tracing::debug!(path = %path.display(), "bib source up to date");
                continue;
            }
            changed = true;
            let source = self.read_source(path, current, encoding, decoder, diagnostics);
            if let Some(previous) = self.sources.get(path) {
                let dropped: Vec<&str> = previous
                    .keys()
                    .filter(|key| !source.entries.iter().any(|e| e.key == *key))
                    .collect();
                if !dropped.is_empty() {
                    tracing::debug!(
                        path = %path.display(),
                        dropped = ?dropped,
                        "bib source no longer defines keys"
                    );
                }
            }
            self.sources.insert(path.clone(), source);
        }

        if changed {
            self.declared = declared;
            self.encoding = encoding.to_string();
            self.rebuild();
        }
        for path in &self.declared {
            if let Some(source) = self.sources.get(path) {
                for error in &source.errors {
                    diagnostics.add(error.to_diagnostic());
                }
            }
        }
        for duplicate in &self.duplicates {
            diagnostics.add(duplicate.to_diagnostic());
        }
        &self.entries
    }

    fn read_source(
        &mut self,
        path: &Path,
        current: Option<SystemTime>,
        encoding: &str,
        decoder: Encoding,
        diagnostics: &mut DiagnosticCollector,
    ) -> BibSource {
        let bytes = match (current, std::fs::read(path)) {
            (Some(_), Ok(bytes)) => bytes,
            (_, result) => {
                let message = match result {
                    Err(err) => err.to_string(),
                    Ok(_) => "modification time unavailable".to_string(),
                };
                diagnostics.add(
                    BibError::SourceUnavailable {
                        path: path.to_path_buf(),
                        message,
                    }
                    .to_diagnostic(),
                );
                return BibSource {
                    path: path.to_path_buf(),
                    modified: Modified::Unavailable,
                    encoding: encoding.to_string(),
                    entries: Vec::new(),
                    errors: Vec::new(),
                };
            }
        };

        tracing::debug!(path = %path.display(), encoding, "parsing bib source");
        self.parse_count += 1;
        let text = decoder.decode(&bytes);
        let parsed = self.parser.parse(&text, &path.display().to_string());

        BibSource {
            path: path.to_path_buf(),
            modified: current.map_or(Modified::Unavailable, Modified::At),
            encoding: encoding.to_string(),
            entries: parsed.entries,
            errors: parsed.errors,
        }
    }

    fn rebuild(&mut self) {
        self.entries.clear();
        self.origins.clear();
        self.duplicates.clear();
        for path in &self.declared {
            let Some(source) = self.sources.get(path) else {
                continue;
            };
            for entry in &source.entries {
                if self.entries.contains_key(&entry.key) {
                    self.duplicates.push(BibError::DuplicateKey {
                        key: entry.key.clone(),
                        path: path.clone(),
                    });
                    continue;
                }
                self.entries.insert(entry.key.clone(), entry.clone());
                self.origins.insert(entry.key.clone(), path.clone());
            }
        }
    }

    /// Merged entries as of the last `ensure` call.
    pub fn entries(&self) -> &IndexMap<String, BibEntry> {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&BibEntry> {
        self.entries.get(key)
    }

    /// Entries of one declared file that survived duplicate elimination, in
    /// file order.
    pub fn entries_for<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a BibEntry> + 'a {
        let path = normalize_path(path);
        self.sources
            .get(&path)
            .map(|source| source.entries.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter(move |entry| self.origins.get(&entry.key) == Some(&path))
    }

    /// Keys contributed by a file.
    pub fn keys_for(&self, path: &Path) -> Vec<&str> {
        self.entries_for(path).map(|e| e.key.as_str()).collect()
    }

    pub fn sources(&self) -> impl Iterator<Item = &BibSource> {
        self.sources.values()
    }

    pub fn source(&self, path: &Path) -> Option<&BibSource> {
        self.sources.get(&normalize_path(path))
    }

    /// Files of the last `ensure` call, in declared order.
    pub fn declared(&self) -> &[PathBuf] {
        &self.declared
    }

    /// Number of file parses performed by this cache instance.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Union with a cache built by another worker.
    ///
    /// Per-file state from `other` replaces ours only when it was read from a
    /// newer file, so merging is commutative for caches of the same files.
    /// Problems are reported by the next `ensure`.
    pub fn merge(&mut self, other: BibSourceCache) {
        for (path, theirs) in other.sources {
            let take = match self.sources.get(&path) {
                None => true,
                Some(ours) => match (ours.modified, theirs.modified) {
                    (Modified::At(a), Modified::At(b)) => b > a,
                    (Modified::Unavailable, Modified::At(_)) => true,
                    _ => false,
                },
            };
            if take {
                self.sources.insert(path, theirs);
            }
        }
        if self.declared.is_empty() {
            self.declared = other.declared;
            self.encoding = other.encoding;
        }
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_bib(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_empty_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = BibSourceCache::new();
        let mut diagnostics = DiagnosticCollector::new();

        let entries = cache.ensure(&[dir.path().join("nope.bib")], "utf-8", &mut diagnostics);

        assert!(entries.is_empty());
        assert_eq!(diagnostics.with_code("Q-20-1").count(), 1);
        let source = cache.source(&dir.path().join("nope.bib")).unwrap();
        assert_eq!(source.modified, Modified::Unavailable);
    }

    #[test]
    fn test_duplicate_key_first_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bib(dir.path(), "a.bib", "@misc{x, title = {From A}}");
        let b = write_bib(dir.path(), "b.bib", "@misc{x, title = {From B}} @misc{y,}");
        let mut cache = BibSourceCache::new();
        let mut diagnostics = DiagnosticCollector::new();

        let entries = cache.ensure(&[a.clone(), b.clone()], "utf-8", &mut diagnostics);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries["x"].field("title"), Some("From A"));
        assert_eq!(diagnostics.with_code("Q-20-3").count(), 1);
        assert_eq!(cache.keys_for(&a), vec!["x"]);
        assert_eq!(cache.keys_for(&b), vec!["y"]);
    }

    #[test]
    fn test_problems_reported_on_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bib(dir.path(), "a.bib", "@misc{bad, title = }\n@misc{x,}\n");
        let b = write_bib(dir.path(), "b.bib", "@misc{x,}");
        let mut cache = BibSourceCache::new();

        for _ in 0..2 {
            let mut diagnostics = DiagnosticCollector::new();
            cache.ensure(&[a.clone(), b.clone()], "utf-8", &mut diagnostics);
            assert_eq!(diagnostics.with_code("Q-20-2").count(), 1);
            assert_eq!(diagnostics.with_code("Q-20-3").count(), 1);
        }
        assert_eq!(cache.parse_count(), 2);
    }

    #[test]
    fn test_encoding_change_forces_reparse() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bib(dir.path(), "a.bib", "@misc{x,}");
        let mut cache = BibSourceCache::new();
        let mut diagnostics = DiagnosticCollector::new();

        cache.ensure(&[a.clone()], "utf-8", &mut diagnostics);
        cache.ensure(&[a.clone()], "latin-1", &mut diagnostics);

        assert_eq!(cache.parse_count(), 2);
    }

    #[test]
    fn test_declared_order_controls_entry_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bib(dir.path(), "a.bib", "@misc{a1,} @misc{a2,}");
        let b = write_bib(dir.path(), "b.bib", "@misc{b1,}");
        let mut cache = BibSourceCache::new();
        let mut diagnostics = DiagnosticCollector::new();

        let keys: Vec<String> = cache
            .ensure(&[b.clone(), a.clone()], "utf-8", &mut diagnostics)
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["b1", "a1", "a2"]);

        // Reordering the declared files rebuilds the map without re-parsing.
        let keys: Vec<String> = cache
            .ensure(&[a, b], "utf-8", &mut diagnostics)
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["a1", "a2", "b1"]);
        assert_eq!(cache.parse_count(), 2);
    }

    #[test]
    fn test_serde_round_trip_keeps_sources() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bib(dir.path(), "a.bib", "@misc{x,}");
        let mut cache = BibSourceCache::new();
        let mut diagnostics = DiagnosticCollector::new();
        cache.ensure(&[a.clone()], "utf-8", &mut diagnostics);

        let json = serde_json::to_string(&cache).unwrap();
        let mut restored: BibSourceCache = serde_json::from_str(&json).unwrap();
        restored.ensure(&[a], "utf-8", &mut diagnostics);

        assert_eq!(restored.parse_count(), 0);
        assert!(restored.entry("x").is_some());
    }
}
