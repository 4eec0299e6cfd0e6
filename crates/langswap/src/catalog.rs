//! # Translation Catalog
//!
//! Per-language tables mapping opaque string keys to display strings.
//! Values may carry embedded markup; the catalog never parses, escapes, or
//! sanitizes them. Key parity across languages is expected but not enforced;
//! [`Catalog::audit`] makes gaps visible without changing lookup behavior.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::LangError;

/// Language code -> key -> display-string tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON of the form
    /// `{"tr": {"nav_home": "Ana Sayfa", ...}, "en": {...}}`.
    pub fn from_json(data: &[u8]) -> Result<Self, LangError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Register a language table, replacing any existing one for the code.
    pub fn insert_language(
        &mut self,
        code: impl Into<String>,
        table: HashMap<String, String>,
    ) {
        self.tables.insert(code.into(), table);
    }

    /// Add or replace a single entry.
    pub fn insert(
        &mut self,
        code: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.tables
            .entry(code.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn has_language(&self, code: &str) -> bool {
        self.tables.contains_key(code)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Look up the display string for a key in a language.
    pub fn lookup(&self, code: &str, key: &str) -> Option<&str> {
        self.tables
            .get(code)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Report every key that is absent from at least one language, relative
    /// to the union of all keys. Findings come back in key order.
    pub fn audit(&self) -> Vec<AuditFinding> {
        let union: BTreeSet<&str> = self
            .tables
            .values()
            .flat_map(|table| table.keys().map(String::as_str))
            .collect();

        let mut codes: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        codes.sort_unstable();

        union
            .into_iter()
            .filter_map(|key| {
                let missing_in: Vec<String> = codes
                    .iter()
                    .filter(|code| self.lookup(code, key).is_none())
                    .map(|code| (*code).to_owned())
                    .collect();
                (!missing_in.is_empty()).then(|| AuditFinding {
                    key: key.to_owned(),
                    missing_in,
                })
            })
            .collect()
    }
}

/// A key absent from one or more languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub key: String,
    pub missing_in: Vec<String>,
}
