use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use minijinja::{Environment, ErrorKind};

use crate::config::UrlType;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::template::{Renderer, TemplateSystem};

/// Jinja templates loaded from a chain of theme directories.
///
/// Directories are searched in order, so a child theme listed before its
/// parent overrides the parent's templates.
pub struct JinjaTemplates {
    themes: Vec<Utf8PathBuf>,
    env: Environment<'static>,
}

impl JinjaTemplates {
    pub fn new<P>(themes: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<Utf8PathBuf>,
    {
        let themes: Vec<Utf8PathBuf> = themes.into_iter().map(Into::into).collect();

        let mut env = Environment::new();
        let search = themes.clone();
        env.set_loader(move |name| match find(&search, name) {
            Some(path) => fs::read_to_string(&path).map(Some).map_err(|e| {
                minijinja::Error::new(ErrorKind::InvalidOperation, format!("{path}: {e}"))
            }),
            None => Ok(None),
        });

        Self { themes, env }
    }

    pub fn themes(&self) -> &[Utf8PathBuf] {
        &self.themes
    }
}

impl TemplateSystem for JinjaTemplates {
    fn template_deps(&self, template: &str) -> Vec<Utf8PathBuf> {
        let mut deps = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![template.to_string()];

        while let Some(name) = stack.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }

            let Some(path) = find(&self.themes, &name) else {
                continue;
            };

            if let Ok(source) = fs::read_to_string(&path) {
                // Reversed so that references are visited in source order.
                stack.extend(references(&source).into_iter().rev());
            }

            deps.push(path);
        }

        deps
    }

    fn asset_path(&self, name: &str) -> Option<Utf8PathBuf> {
        find(&self.themes, name)
    }
}

impl Renderer for JinjaTemplates {
    fn render(
        &self,
        template: &str,
        destination: &Utf8Path,
        context: &RenderContext,
        url_type: Option<UrlType>,
    ) -> anyhow::Result<()> {
        let mut vars = context.to_map();
        vars.insert(
            "url_type".into(),
            url_type.map(UrlType::as_str).map_or(serde_json::Value::Null, Into::into),
        );

        let text = self
            .env
            .get_template(template)
            .and_then(|tmpl| tmpl.render(&vars))
            .map_err(|e| match e.kind() {
                ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(template.into()),
                _ => RenderError::Template(template.into(), e),
            })?;

        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir).map_err(|e| RenderError::Write(dir.to_owned(), e))?;
        }

        fs::write(destination, text).map_err(|e| RenderError::Write(destination.to_owned(), e))?;

        tracing::info!("rendered {} -> {}", template, destination);

        Ok(())
    }
}

fn find(themes: &[Utf8PathBuf], name: &str) -> Option<Utf8PathBuf> {
    themes
        .iter()
        .map(|theme| theme.join(name))
        .find(|path| path.is_file())
}

/// Names of the templates pulled in by `extends`, `include`, `import` and
/// `from` tags. Dynamic names are ignored.
fn references(source: &str) -> Vec<String> {
    let mut refs = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{%") {
        rest = &rest[start + 2..];
        let Some(end) = rest.find("%}") else {
            break;
        };

        let tag = rest[..end].trim_matches(|c: char| c == '-' || c == '+' || c.is_whitespace());
        rest = &rest[end + 2..];

        let mut words = tag.splitn(2, char::is_whitespace);
        let (Some(keyword), Some(args)) = (words.next(), words.next()) else {
            continue;
        };

        if !matches!(keyword, "extends" | "include" | "import" | "from") {
            continue;
        }

        if let Some(name) = string_literal(args.trim_start()) {
            refs.push(name.to_string());
        }
    }

    refs
}

fn string_literal(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let text = &text[1..];
    text.find(quote).map(|end| &text[..end])
}
