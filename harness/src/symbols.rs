//! Symbol tables mapping 1-based cell values to script glyphs.
//!
//! Two tables are built in: Devanagari (rendered first in solution files)
//! and Kannada. Both share one 64-entry layout: 27 vowel forms, 33
//! consonants, then 4 specials, matching the default
//! [`LabelScheme`](chakra_kernel::grid::label::LabelScheme) bounds.
//!
//! Custom tables load from JSON: `{"script": "...", "symbols": ["..", ..]}`.

use std::collections::BTreeMap;
use std::path::Path;

use chakra_kernel::grid::topology::Topology;
use chakra_kernel::proof::hash::{canonical_hash, ContentHash};
use chakra_kernel::proof::hash_domain::HashDomain;
use serde::{Deserialize, Serialize};

const DEVANAGARI: [&str; 64] = [
    "अ", "आ", "आा", "इ", "ई", "ईी", "उ", "ऊ", "ऊू", "ऋ", "ॠ", "ॠॄ", "ऌ", "ळु", "ळू", "ए",
    "एा", "एाा", "ऐ", "ऐो", "ऐोो", "ओ", "ओो", "ओोो", "औ", "औौ", "औौौ", "क", "ख", "ग", "घ",
    "ङ", "च", "छ", "ज", "झ", "ञ", "ट", "ठ", "ड", "ढ", "ण", "त", "थ", "द", "ध", "न", "प", "फ",
    "ब", "भ", "म", "य", "र", "ल", "व", "श", "ष", "स", "ह", "ं", "ः", "…", "::",
];

const KANNADA: [&str; 64] = [
    "ಅ", "ಆ", "ಆಾ", "ಇ", "ಈ", "ಈೀ", "ಉ", "ಊ", "ಊೂ", "ಋ", "ೠ", "ೠೄ", "ಌ", "ಳು", "ಳೂ", "ಎ",
    "ಏ", "ಏೇ", "ಐ", "ಐೈ", "ಐೈೈ", "ಒ", "ಓ", "ಓೋ", "ಔ", "ಔೌ", "ಔೌೌ", "ಕ", "ಖ", "ಗ", "ಘ",
    "ಙ", "ಚ", "ಛ", "ಜ", "ಝ", "ಞ", "ಟ", "ಠ", "ಡ", "ಢ", "ಣ", "ತ", "ಥ", "ದ", "ಧ", "ನ", "ಪ", "ಫ",
    "ಬ", "ಭ", "ಮ", "ಯ", "ರ", "ಲ", "ವ", "ಶ", "ಷ", "ಸ", "ಹ", "ಂ", "ಃ", "…", "::",
];

/// Symbol table failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("cannot read symbol table {path}: {detail}")]
    Io { path: String, detail: String },
    #[error("symbol table is not valid JSON: {detail}")]
    Json { detail: String },
    #[error("symbol table {script:?} has no symbols")]
    EmptyTable { script: String },
    #[error("symbol {symbol:?} appears at values {first} and {second}")]
    DuplicateSymbol {
        symbol: String,
        first: u32,
        second: u32,
    },
    #[error("symbol at value {value} is empty or contains a quote or comma")]
    BadSymbol { value: u32 },
    #[error("value {value} has no symbol in {script:?} ({len} symbols)")]
    OutOfRange { value: u32, script: String, len: usize },
    #[error("unknown symbol {symbol:?} in {script:?}")]
    UnknownSymbol { symbol: String, script: String },
    #[error("malformed rendering near {token:?}")]
    Malformed { token: String },
}

/// A named, 1-based symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSymbolTable", into = "RawSymbolTable")]
pub struct SymbolTable {
    script: String,
    symbols: Vec<String>,
    #[serde(skip)]
    index: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize)]
struct RawSymbolTable {
    script: String,
    symbols: Vec<String>,
}

impl TryFrom<RawSymbolTable> for SymbolTable {
    type Error = SymbolError;

    fn try_from(raw: RawSymbolTable) -> Result<Self, Self::Error> {
        Self::new(raw.script, raw.symbols)
    }
}

impl From<SymbolTable> for RawSymbolTable {
    fn from(table: SymbolTable) -> Self {
        Self {
            script: table.script,
            symbols: table.symbols,
        }
    }
}

impl SymbolTable {
    /// Build a table. `symbols[0]` is the glyph for value 1.
    ///
    /// # Errors
    ///
    /// Rejects empty tables, empty symbols, symbols containing `"` or `,`
    /// (they would break the rendered form), and duplicates.
    pub fn new(script: impl Into<String>, symbols: Vec<String>) -> Result<Self, SymbolError> {
        let script = script.into();
        if symbols.is_empty() {
            return Err(SymbolError::EmptyTable { script });
        }
        let mut index = BTreeMap::new();
        for (value, symbol) in (1u32..).zip(&symbols) {
            if symbol.is_empty() || symbol.contains(['"', ',']) {
                return Err(SymbolError::BadSymbol { value });
            }
            if let Some(first) = index.insert(symbol.clone(), value) {
                return Err(SymbolError::DuplicateSymbol {
                    symbol: symbol.clone(),
                    first,
                    second: value,
                });
            }
        }
        Ok(Self {
            script,
            symbols,
            index,
        })
    }

    #[must_use]
    pub fn devanagari() -> Self {
        Self::builtin("Devanagari", &DEVANAGARI)
    }

    #[must_use]
    pub fn kannada() -> Self {
        Self::builtin("Kannada", &KANNADA)
    }

    fn builtin(script: &str, glyphs: &[&str]) -> Self {
        let symbols: Vec<String> = glyphs.iter().map(|s| (*s).to_string()).collect();
        let index = (1u32..).zip(&symbols).map(|(v, s)| (s.clone(), v)).collect();
        Self {
            script: script.to_string(),
            symbols,
            index,
        }
    }

    /// Parse a JSON table.
    ///
    /// # Errors
    ///
    /// [`SymbolError::Json`] on malformed JSON, otherwise as [`SymbolTable::new`].
    pub fn from_json(text: &str) -> Result<Self, SymbolError> {
        let raw: RawSymbolTable =
            serde_json::from_str(text).map_err(|e| SymbolError::Json {
                detail: e.to_string(),
            })?;
        Self::try_from(raw)
    }

    /// Load a JSON table from disk.
    ///
    /// # Errors
    ///
    /// [`SymbolError::Io`] if the file cannot be read, otherwise as
    /// [`SymbolTable::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SymbolError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SymbolError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Glyph for a 1-based value.
    ///
    /// # Errors
    ///
    /// [`SymbolError::OutOfRange`] for 0 or values past the end.
    pub fn symbol(&self, value: u32) -> Result<&str, SymbolError> {
        usize::try_from(value)
            .ok()
            .and_then(|v| v.checked_sub(1))
            .and_then(|i| self.symbols.get(i))
            .map(String::as_str)
            .ok_or_else(|| SymbolError::OutOfRange {
                value,
                script: self.script.clone(),
                len: self.symbols.len(),
            })
    }

    /// Value of a glyph, if present.
    #[must_use]
    pub fn value_of(&self, symbol: &str) -> Option<u32> {
        self.index.get(symbol).copied()
    }

    /// Render values as `"sym",` repeated.
    ///
    /// # Errors
    ///
    /// [`SymbolError::OutOfRange`] for the first value without a glyph.
    pub fn render(&self, values: &[u32]) -> Result<String, SymbolError> {
        let mut out = String::new();
        for &value in values {
            out.push('"');
            out.push_str(self.symbol(value)?);
            out.push_str("\",");
        }
        Ok(out)
    }

    /// Inverse of [`SymbolTable::render`].
    ///
    /// # Errors
    ///
    /// [`SymbolError::Malformed`] for tokens that are not quoted, and
    /// [`SymbolError::UnknownSymbol`] for glyphs not in this table.
    pub fn decode(&self, rendered: &str) -> Result<Vec<u32>, SymbolError> {
        rendered
            .trim()
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                let token = token.trim();
                let symbol = token
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .ok_or_else(|| SymbolError::Malformed {
                        token: token.to_string(),
                    })?;
                self.value_of(symbol)
                    .ok_or_else(|| SymbolError::UnknownSymbol {
                        symbol: symbol.to_string(),
                        script: self.script.clone(),
                    })
            })
            .collect()
    }

    /// Check that every cell value of `topology` has a glyph.
    ///
    /// # Errors
    ///
    /// [`SymbolError::OutOfRange`] for the largest uncovered value.
    pub fn check_covers(&self, topology: &Topology) -> Result<(), SymbolError> {
        match topology.vertices().iter().map(|v| v.value()).max() {
            Some(max) => self.symbol(max).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Content hash of the script name and glyphs.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        let mut data = Vec::new();
        data.extend_from_slice(self.script.as_bytes());
        data.push(0);
        for symbol in &self.symbols {
            data.extend_from_slice(symbol.as_bytes());
            data.push(0);
        }
        canonical_hash(HashDomain::SymbolTable, &data)
    }
}
