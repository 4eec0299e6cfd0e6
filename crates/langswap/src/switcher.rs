//! # Language Switcher
//!
//! One synchronous pass rewrites every tagged element of a document to the
//! selected language. Repeated invocations fully overwrite each other, and a
//! lookup miss never errors: it follows the configured policy and lands in
//! the returned report instead.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::document::Document;
use crate::error::LangError;

/// Policy applied when the active language lacks a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Leave the element's current content untouched.
    #[default]
    LeaveUnchanged,
    /// Substitute the key name itself.
    UseKey,
    /// Borrow the entry from another language when it has one; otherwise the
    /// element stays untouched.
    FallbackTo(String),
}

/// Configuration for a switcher instance. One explicit object owns the
/// language selection; there is no ambient current-language state.
#[derive(Debug, Clone)]
pub struct SwitcherConfig {
    /// Language codes in toggle order; the toggle advances through this
    /// ring. Two entries give the classic binary flip.
    pub cycle: Vec<String>,
    /// Language applied by [`Switcher::initialize`].
    pub default_language: String,
    pub missing_key_policy: MissingKeyPolicy,
}

impl SwitcherConfig {
    /// Two-language configuration with the first code as the default.
    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        let first = first.into();
        Self {
            cycle: vec![first.clone(), second.into()],
            default_language: first,
            missing_key_policy: MissingKeyPolicy::default(),
        }
    }

    /// Configuration over an explicit language ring; the first code is the
    /// default.
    pub fn cycle<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cycle: Vec<String> = codes.into_iter().map(Into::into).collect();
        let default_language = cycle.first().cloned().unwrap_or_default();
        Self {
            cycle,
            default_language,
            missing_key_policy: MissingKeyPolicy::default(),
        }
    }

    /// Set the language applied on initialization.
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = code.into();
        self
    }

    /// Set the policy for keys the active language lacks.
    pub fn with_missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key_policy = policy;
        self
    }
}

/// Result of one language pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapReport {
    /// The language that was applied.
    pub language: String,
    /// Elements whose content was overwritten from the catalog.
    pub applied: usize,
    /// Keys the active language had no entry for, in document order.
    pub missing: Vec<String>,
}

/// Rewrites tagged document content to the active language.
pub struct Switcher {
    catalog: Catalog,
    config: SwitcherConfig,
    current: String,
}

impl Switcher {
    /// Create a switcher. Every code in the cycle must have a catalog table,
    /// the cycle needs at least two entries, and the default language must be
    /// part of the cycle.
    pub fn new(catalog: Catalog, config: SwitcherConfig) -> Result<Self, LangError> {
        if config.cycle.len() < 2 {
            return Err(LangError::CycleTooShort(config.cycle.len()));
        }
        for code in &config.cycle {
            if !catalog.has_language(code) {
                return Err(LangError::UnknownLanguage(code.clone()));
            }
        }
        if !config.cycle.contains(&config.default_language) {
            return Err(LangError::UnknownLanguage(config.default_language.clone()));
        }

        let current = config.default_language.clone();
        Ok(Self {
            catalog,
            config,
            current,
        })
    }

    /// The active language code. Never persisted; a fresh switcher starts at
    /// the configured default again.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The code the toggle would switch to next.
    pub fn next_language(&self) -> &str {
        let pos = self
            .config
            .cycle
            .iter()
            .position(|code| code == &self.current)
            .unwrap_or(0);
        &self.config.cycle[(pos + 1) % self.config.cycle.len()]
    }

    /// Apply `code` to every tagged element of the document in one pass.
    ///
    /// Hits overwrite the slot content verbatim, markup included. Misses are
    /// warned about and reported, then handled per the configured policy;
    /// they never error. The toggle label, when the document has one, is set
    /// to the uppercased code of the next language in the cycle.
    pub fn set_language(
        &mut self,
        code: &str,
        document: &mut dyn Document,
    ) -> Result<SwapReport, LangError> {
        if !self.config.cycle.iter().any(|c| c == code) {
            return Err(LangError::UnknownLanguage(code.to_owned()));
        }
        self.current = code.to_owned();

        let mut report = SwapReport {
            language: code.to_owned(),
            ..SwapReport::default()
        };

        for element in document.tagged_mut() {
            match self.catalog.lookup(code, &element.key) {
                Some(text) => {
                    element.content = text.to_owned();
                    report.applied += 1;
                }
                None => {
                    warn!(key = %element.key, language = code, "no translation for key");
                    report.missing.push(element.key.clone());
                    match &self.config.missing_key_policy {
                        MissingKeyPolicy::LeaveUnchanged => {}
                        MissingKeyPolicy::UseKey => element.content = element.key.clone(),
                        MissingKeyPolicy::FallbackTo(other) => {
                            if let Some(text) = self.catalog.lookup(other, &element.key) {
                                element.content = text.to_owned();
                            }
                        }
                    }
                }
            }
        }

        // The toggle always names the language a click would switch to.
        let label = self.next_language().to_uppercase();
        if let Some(slot) = document.toggle_label_mut() {
            *slot = label;
        }

        debug!(
            language = code,
            applied = report.applied,
            missing = report.missing.len(),
            "language pass complete"
        );
        Ok(report)
    }

    /// Flip to the next language in the cycle.
    pub fn toggle(&mut self, document: &mut dyn Document) -> Result<SwapReport, LangError> {
        let next = self.next_language().to_owned();
        self.set_language(&next, document)
    }

    /// One-time startup pass applying the default language before any user
    /// interaction.
    pub fn initialize(&mut self, document: &mut dyn Document) -> Result<SwapReport, LangError> {
        let default = self.config.default_language.clone();
        self.set_language(&default, document)
    }
}
