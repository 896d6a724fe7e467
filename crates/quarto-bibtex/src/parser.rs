/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! BibTeX database reader.
//!
//! The bibliography engine only needs entries out of a source file, so the
//! reader sits behind the [`BibParser`] trait. [`BibtexParser`] handles the
//! classic BibTeX grammar:
//!
//! - `@type{key, field = {value}, field = "value", field = 1984}`
//! - `#` concatenation and `@string` macros (month macros are predefined)
//! - `@comment` and `@preamble` blocks, and free text between entries
//! - `(` ... `)` as an alternative entry delimiter
//!
//! A malformed entry is reported and skipped; the rest of the file is still
//! read.

use crate::error::BibError;
use crate::model::BibEntry;
use crate::names::parse_name_list;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt::Debug;

/// Fields holding person lists rather than text.
pub const PERSON_FIELDS: &[&str] = &["author", "editor"];

/// Result of reading one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBibFile {
    /// Entries in source order.
    pub entries: Vec<BibEntry>,
    /// Problems found while reading; each one cost at most one entry.
    pub errors: Vec<BibError>,
}

/// A bibliography database reader.
pub trait BibParser: Send + Sync + Debug {
    /// Read every entry of `text`. `source_name` is used in error messages.
    fn parse(&self, text: &str, source_name: &str) -> ParsedBibFile;
}

/// The default BibTeX reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct BibtexParser;

impl BibParser for BibtexParser {
    fn parse(&self, text: &str, source_name: &str) -> ParsedBibFile {
        Scanner::new(text, source_name).run()
    }
}

fn default_macros() -> HashMap<String, String> {
    [
        ("jan", "January"),
        ("feb", "February"),
        ("mar", "March"),
        ("apr", "April"),
        ("may", "May"),
        ("jun", "June"),
        ("jul", "July"),
        ("aug", "August"),
        ("sep", "September"),
        ("oct", "October"),
        ("nov", "November"),
        ("dec", "December"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    source_name: &'a str,
    macros: HashMap<String, String>,
    result: ParsedBibFile,
}

type ScanResult<T> = std::result::Result<T, String>;

impl<'a> Scanner<'a> {
    fn new(text: &str, source_name: &'a str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            source_name,
            macros: default_macros(),
            result: ParsedBibFile::default(),
        }
    }

    fn run(mut self) -> ParsedBibFile {
        while self.skip_to_at() {
            let start_line = self.line;
            if let Err(message) = self.block() {
                self.result.errors.push(BibError::Parse {
                    source_name: self.source_name.to_string(),
                    line: start_line,
                    message,
                });
            }
        }
        self.result
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Advance past the next `@`; text before it is an implicit comment.
    fn skip_to_at(&mut self) -> bool {
        while let Some(c) = self.bump() {
            if c == '@' {
                return true;
            }
        }
        false
    }

    fn expect(&mut self, expected: char) -> ScanResult<()> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!("expected '{}' but found '{}'", expected, c)),
            None => Err(format!("expected '{}' but reached end of file", expected)),
        }
    }

    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || "-_:.+/'!?*&;<>[]`|$^".contains(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn block(&mut self) -> ScanResult<()> {
        self.skip_ws();
        let kind = self.identifier().to_lowercase();
        if kind.is_empty() {
            return Err("expected an entry type after '@'".to_string());
        }
        if kind == "comment" {
            self.skip_ws();
            if self.peek() == Some('{') {
                self.bump();
                self.braced_raw()?;
            }
            return Ok(());
        }

        self.skip_ws();
        let close = match self.bump() {
            Some('{') => '}',
            Some('(') => ')',
            Some(c) => return Err(format!("expected '{{' or '(' after @{} but found '{}'", kind, c)),
            None => return Err(format!("unexpected end of file after @{}", kind)),
        };

        match kind.as_str() {
            "preamble" => {
                self.value()?;
                self.expect(close)
            }
            "string" => {
                self.skip_ws();
                let name = self.identifier().to_lowercase();
                if name.is_empty() {
                    return Err("expected a macro name in @string".to_string());
                }
                self.expect('=')?;
                let value = self.value()?;
                self.macros.insert(name, value);
                self.expect(close)
            }
            _ => self.entry(kind, close),
        }
    }

    fn entry(&mut self, kind: String, close: char) -> ScanResult<()> {
        self.skip_ws();
        let mut key = String::new();
        while let Some(c) = self.peek() {
            if c == ',' || c == close || c.is_whitespace() {
                break;
            }
            key.push(c);
            self.bump();
        }
        if key.is_empty() {
            return Err(format!("@{} entry without a citation key", kind));
        }

        let mut fields: IndexMap<String, String> = IndexMap::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(format!(
                        "expected ',' or '{}' in entry '{}' but found '{}'",
                        close, key, c
                    ));
                }
                None => return Err(format!("unterminated entry '{}'", key)),
            }
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            let name = self.identifier().to_lowercase();
            if name.is_empty() {
                return Err(format!("expected a field name in entry '{}'", key));
            }
            self.expect('=')?;
            let value = self.value()?;
            if fields.contains_key(&name) {
                tracing::debug!(key = %key, field = %name, "repeated field, keeping first value");
            } else {
                fields.insert(name, value);
            }
        }

        let mut entry = BibEntry::new(kind, key);
        for (name, value) in fields {
            if PERSON_FIELDS.contains(&name.as_str()) {
                entry.persons.insert(name, parse_name_list(&value));
            } else {
                entry.fields.insert(name, value);
            }
        }
        self.result.entries.push(entry);
        Ok(())
    }

    /// A field value: parts joined by `#`, whitespace collapsed.
    fn value(&mut self) -> ScanResult<String> {
        let mut value = String::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('{') => {
                    self.bump();
                    value.push_str(&self.braced_raw()?);
                }
                Some('"') => {
                    self.bump();
                    value.push_str(&self.quoted()?);
                }
                Some(c) if c.is_ascii_digit() => {
                    while let Some(d) = self.peek().filter(char::is_ascii_digit) {
                        value.push(d);
                        self.bump();
                    }
                }
                Some(_) => {
                    let name = self.identifier();
                    if name.is_empty() {
                        return Err("expected a field value".to_string());
                    }
                    match self.macros.get(&name.to_lowercase()) {
                        Some(expansion) => value.push_str(expansion),
                        None => return Err(format!("undefined macro '{}'", name)),
                    }
                }
                None => return Err("unexpected end of file in field value".to_string()),
            }
            self.skip_ws();
            if self.peek() == Some('#') {
                self.bump();
            } else {
                break;
            }
        }
        Ok(collapse_whitespace(&value))
    }

    /// Content of a `{...}` group whose opening brace was consumed; inner
    /// braces are kept verbatim.
    fn braced_raw(&mut self) -> ScanResult<String> {
        let mut depth = 0usize;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => return Ok(out),
                '}' => depth -= 1,
                _ => {}
            }
            out.push(c);
        }
        Err("unbalanced braces".to_string())
    }

    /// Content of a `"..."` string whose opening quote was consumed.
    fn quoted(&mut self) -> ScanResult<String> {
        let mut depth = 0usize;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' if depth == 0 => return Ok(out),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            out.push(c);
        }
        Err("unterminated quoted value".to_string())
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> ParsedBibFile {
        BibtexParser.parse(text, "test.bib")
    }

    #[test]
    fn test_parse_simple_entry() {
        let parsed = parse(
            r#"
            @Book{knuth84,
              author    = {Donald E. Knuth},
              title     = "The {TeX}book",
              publisher = {Addison-Wesley},
              year      = 1984,
            }
            "#,
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.entries.len(), 1);
        let entry = &parsed.entries[0];
        assert_eq!(entry.key, "knuth84");
        assert_eq!(entry.entry_type, "book");
        assert_eq!(entry.field("title"), Some("The {TeX}book"));
        assert_eq!(entry.field("year"), Some("1984"));
        assert_eq!(entry.persons("author").unwrap()[0].family_name(), "Knuth");
        assert!(entry.field("author").is_none());
    }

    #[test]
    fn test_string_macros_and_concatenation() {
        let parsed = parse(
            r#"
            @string{aw = "Addison-Wesley"}
            @misc{a, publisher = aw # { Publishing}, month = jan}
            "#,
        );
        let entry = &parsed.entries[0];
        assert_eq!(entry.field("publisher"), Some("Addison-Wesley Publishing"));
        assert_eq!(entry.field("month"), Some("January"));
    }

    #[test]
    fn test_comments_and_preamble_are_skipped() {
        let parsed = parse(
            r#"
            This text is ignored.
            @comment{ anything @goes here }
            @preamble{ "\newcommand{\noop}[1]{}" }
            @article(paren, title = {Parenthesised})
            "#,
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].key, "paren");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let parsed = parse("@misc{w, title = {A\n    long\ttitle}}");
        assert_eq!(parsed.entries[0].field("title"), Some("A long title"));
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let parsed = parse(
            r#"@misc{bad, title = }
@misc{good, title = {Fine}}
"#,
        );
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].key, "good");
        assert_eq!(parsed.errors.len(), 1);
        match &parsed.errors[0] {
            BibError::Parse { line, .. } => assert_eq!(*line, 1),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_undefined_macro_reported() {
        let parsed = parse("@misc{m, publisher = nowhere}");
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].to_string().contains("undefined macro 'nowhere'"));
    }

    #[test]
    fn test_entry_order_preserved() {
        let parsed = parse("@misc{c,} @misc{a,} @misc{b,}");
        let keys: Vec<_> = parsed.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}
