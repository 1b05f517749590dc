//! Seams to the host's template engine.

#[cfg(feature = "minijinja")]
mod jinja;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::UrlType;
use crate::context::RenderContext;

#[cfg(feature = "minijinja")]
pub use self::jinja::JinjaTemplates;

/// Resolves the files a template depends on.
pub trait TemplateSystem: Send + Sync {
    /// Files whose modification should re-render `template`. Unknown
    /// templates have no dependencies; the failure is left to the renderer.
    fn template_deps(&self, template: &str) -> Vec<Utf8PathBuf>;

    /// Looks up a file of the active theme, e.g. `bundles` or `engine`.
    fn asset_path(&self, _name: &str) -> Option<Utf8PathBuf> {
        None
    }
}

/// Renders a template into a file.
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        template: &str,
        destination: &Utf8Path,
        context: &RenderContext,
        url_type: Option<UrlType>,
    ) -> anyhow::Result<()>;
}
