//! Translated messages used for page titles.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::CatalogError;

/// Read-only source of translated strings.
pub trait MessageCatalog: Send + Sync {
    /// Returns the message stored under `key` for `lang`, if any.
    fn lookup(&self, lang: &str, key: &str) -> Option<Cow<'_, str>>;
}

/// A catalog that never has a translation.
impl MessageCatalog for () {
    fn lookup(&self, _: &str, _: &str) -> Option<Cow<'_, str>> {
        None
    }
}

/// In-memory catalog mapping `lang -> key -> message`.
///
/// ```
/// use errorpages::{MessageCatalog, Messages};
///
/// let messages = Messages::from_json(r#"{ "pl": { "Not Found": "Nie znaleziono" } }"#).unwrap();
/// assert_eq!(messages.lookup("pl", "Not Found").as_deref(), Some("Nie znaleziono"));
/// assert_eq!(messages.lookup("de", "Not Found"), None);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Messages {
    langs: HashMap<String, HashMap<String, String>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        lang: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.langs
            .entry(lang.into())
            .or_default()
            .insert(key.into(), message.into());
        self
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}

impl MessageCatalog for Messages {
    fn lookup(&self, lang: &str, key: &str) -> Option<Cow<'_, str>> {
        self.langs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .map(|message| Cow::Borrowed(message.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut messages = Messages::new();
        messages
            .insert("en", "http-error-code-404", "Oops")
            .insert("de", "Not Found", "Nicht gefunden");

        assert_eq!(
            messages.lookup("en", "http-error-code-404").as_deref(),
            Some("Oops")
        );
        assert_eq!(
            messages.lookup("de", "Not Found").as_deref(),
            Some("Nicht gefunden")
        );
        assert_eq!(messages.lookup("en", "Not Found"), None);
        assert_eq!(messages.lookup("fr", "Not Found"), None);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            Messages::from_json(r#"{ "en": ["Oops"] }"#),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_unit_catalog() {
        assert_eq!(().lookup("en", "http-error-code-404"), None);
    }
}
