//! # langswap
//!
//! Declarative multi-language text substitution for tagged documents.
//! A catalog holds one flat key -> display-string table per language; a
//! switcher rewrites every tagged element of a document to the selected
//! language in a single pass and keeps a toggle control labeled with the
//! language a click would switch to.
//!
//! Lookup misses never fail a pass: the element keeps its previous content
//! (or follows the configured stricter policy) and the miss is reported.

pub mod catalog;
pub mod document;
pub mod error;
pub mod switcher;

pub use catalog::{AuditFinding, Catalog};
pub use document::{Document, Slot, StaticDocument, TaggedElement};
pub use error::LangError;
pub use switcher::{MissingKeyPolicy, SwapReport, Switcher, SwitcherConfig};
