//! Decoding of bibliography files.

use crate::error::BibError;

/// Encodings a bibliography source may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// UTF-8 with an optional byte order mark.
    Utf8Sig,
    Latin1,
}

impl Encoding {
    /// Look up an encoding by (case-insensitive) name.
    pub fn from_name(name: &str) -> Result<Self, BibError> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Encoding::Utf8Sig),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            _ => Err(BibError::UnknownEncoding {
                encoding: name.to_string(),
            }),
        }
    }

    /// Decode raw file bytes. Invalid UTF-8 sequences are replaced rather
    /// than rejected.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Utf8Sig => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8_lossy(bytes).into_owned()
            }
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}
