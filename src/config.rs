//! Host configuration consumed by the error page generator.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the host site writes its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlType {
    /// Links relative to the current page, e.g. `../about/`.
    #[default]
    RelPath,
    /// Links relative to the site root, e.g. `/about/`.
    FullPath,
    /// Fully qualified links, e.g. `https://example.com/about/`.
    Absolute,
}

impl UrlType {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlType::RelPath => "rel_path",
            UrlType::FullPath => "full_path",
            UrlType::Absolute => "absolute",
        }
    }

    /// The url type error pages are rendered with.
    ///
    /// Error pages are served from arbitrary locations, so relative links
    /// would break. Sites using relative links get root-relative ones
    /// instead; all others keep the renderer's default.
    pub fn for_error_pages(self) -> Option<UrlType> {
        match self {
            UrlType::RelPath => Some(UrlType::FullPath),
            _ => None,
        }
    }
}

/// Site configuration relevant to error pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Status codes to create pages for.
    pub create_http_error_pages: Vec<u16>,
    /// Language tag -> output subdirectory (`""` for the default language).
    pub translations: BTreeMap<String, String>,
    /// Root directory of the generated site.
    pub output_folder: Utf8PathBuf,
    /// Output file name, `{code}` and `{lang}` are substituted.
    pub http_error_page_output_pattern: String,
    /// Template name, `{code}` and `{lang}` are substituted.
    pub http_error_page_template_pattern: String,
    pub url_type: UrlType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_http_error_pages: Vec::new(),
            translations: BTreeMap::from([("en".to_string(), String::new())]),
            output_folder: Utf8PathBuf::from("output"),
            http_error_page_output_pattern: "{code}.html".to_string(),
            http_error_page_template_pattern: "{code}.tmpl".to_string(),
            url_type: UrlType::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}
