//! Values handed to templates and folded into cache fingerprints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variables available to an error page template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RenderContext {
    pub http_error_code: u16,
    /// `null` for codes without a known reason phrase.
    pub http_error_message: Option<&'static str>,
    /// Omitted entirely when no title could be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub lang: String,
}

impl RenderContext {
    /// The context as a JSON object, keyed by variable name.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("http_error_code".into(), Value::from(self.http_error_code));
        map.insert(
            "http_error_message".into(),
            self.http_error_message.map_or(Value::Null, Value::from),
        );
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::from(title.as_str()));
        }
        map.insert("lang".into(), Value::from(self.lang.as_str()));
        map
    }
}

/// Site-wide template state supplied by the host.
///
/// None of this is read by the error page itself, but every value here can
/// change what a rendered page looks like, so it all takes part in the cache
/// fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalContext {
    /// Global template variables.
    pub global: BTreeMap<String, Value>,
    /// Items registered for each template hook.
    pub template_hooks: BTreeMap<String, Vec<Value>>,
    /// Translatable global variables, `key -> lang -> value`.
    pub translatable: BTreeMap<String, BTreeMap<String, Value>>,
    /// Navigation links per language.
    pub navigation_links: BTreeMap<String, Value>,
}

impl GlobalContext {
    /// Resolves a translatable variable for `lang`, `null` if untranslated.
    pub fn translated(&self, key: &str, lang: &str) -> Value {
        self.translatable
            .get(key)
            .and_then(|langs| langs.get(lang))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn navigation_links(&self, lang: &str) -> Value {
        self.navigation_links
            .get(lang)
            .cloned()
            .unwrap_or(Value::Null)
    }
}
