//! # Document Model
//!
//! The host page is an external collaborator; the switcher only sees it
//! through the [`Document`] trait. Elements opt into translation by carrying
//! a key, and each one declares which slot the replacement string lands in.

use serde::{Deserialize, Serialize};

/// Where a translated string lands in an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Rendered content. Replacement strings may carry embedded markup and
    /// are applied verbatim, never escaped.
    Markup,
    /// Placeholder text of an input-like control.
    Placeholder,
}

/// An element opted into translation via its key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedElement {
    /// Lookup key, stable across languages.
    pub key: String,
    pub slot: Slot,
    /// Current content of the slot.
    pub content: String,
}

impl TaggedElement {
    pub fn new(key: impl Into<String>, slot: Slot, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot,
            content: content.into(),
        }
    }
}

/// Everything the switcher needs from a page.
pub trait Document {
    /// Every tagged element, in document order.
    fn tagged_mut(&mut self) -> Box<dyn Iterator<Item = &mut TaggedElement> + '_>;

    /// Mutable label of the language toggle control, if the document has one.
    fn toggle_label_mut(&mut self) -> Option<&mut String>;
}

/// In-memory document; doubles as the on-disk page model for tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticDocument {
    pub elements: Vec<TaggedElement>,
    /// Label of the toggle control; `None` when the page has no toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<String>,
}

impl StaticDocument {
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// First element tagged with the key.
    pub fn element(&self, key: &str) -> Option<&TaggedElement> {
        self.elements.iter().find(|element| element.key == key)
    }
}

impl Document for StaticDocument {
    fn tagged_mut(&mut self) -> Box<dyn Iterator<Item = &mut TaggedElement> + '_> {
        Box::new(self.elements.iter_mut())
    }

    fn toggle_label_mut(&mut self) -> Option<&mut String> {
        self.toggle.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_model_json() {
        let data = br#"{
            "elements": [
                {"key": "nav_home", "slot": "markup", "content": "Ana Sayfa"},
                {"key": "form_email", "slot": "placeholder", "content": "E-posta"}
            ],
            "toggle": "EN"
        }"#;

        let document = StaticDocument::from_json(data).unwrap();
        assert_eq!(document.elements.len(), 2);
        assert_eq!(document.elements[1].slot, Slot::Placeholder);
        assert_eq!(document.toggle.as_deref(), Some("EN"));

        let round = StaticDocument::from_json(&document.to_json().unwrap()).unwrap();
        assert_eq!(round, document);
    }

    #[test]
    fn test_toggle_is_optional() {
        let data = br#"{"elements": []}"#;
        let mut document = StaticDocument::from_json(data).unwrap();
        assert!(document.toggle_label_mut().is_none());
    }
}
