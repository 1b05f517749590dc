//! Generation of the error page tasks.

use serde_json::Value;

use crate::catalog::MessageCatalog;
use crate::config::Config;
use crate::context::{GlobalContext, RenderContext};
use crate::filter::FilterPipeline;
use crate::fingerprint::{Fingerprint, config_changed};
use crate::output::{destination, expand_pattern, normalize_path};
use crate::status::reason_phrase;
use crate::task::{Action, BASENAME, GroupTask, RenderCall, TaskDescriptor};
use crate::template::TemplateSystem;

/// Namespace of the cache keys of error pages.
pub const NAMESPACE: &str = "nikola.plugins.render_error_pages";

/// Theme files every error page depends on, when the theme has them.
const THEME_ASSETS: [&str; 3] = ["bundles", "parent", "engine"];

/// Generates one render task per status code and language.
///
/// All collaborators are borrowed read-only, generating tasks has no side
/// effects and can be repeated any number of times.
///
/// ```
/// use errorpages::{Config, ErrorPages, GlobalContext, Messages};
/// use errorpages::template::TemplateSystem;
/// use camino::Utf8PathBuf;
///
/// struct NoDeps;
///
/// impl TemplateSystem for NoDeps {
///     fn template_deps(&self, _: &str) -> Vec<Utf8PathBuf> {
///         vec![]
///     }
/// }
///
/// let config = Config {
///     create_http_error_pages: vec![404, 500],
///     ..Config::default()
/// };
/// let messages = Messages::new();
/// let globals = GlobalContext::default();
/// let pages = ErrorPages::new(&config, &messages, &NoDeps, &globals);
///
/// assert_eq!(pages.tasks().count(), 2);
/// ```
pub struct ErrorPages<'a> {
    config: &'a Config,
    catalog: &'a dyn MessageCatalog,
    templates: &'a dyn TemplateSystem,
    globals: &'a GlobalContext,
    filters: Option<&'a FilterPipeline>,
}

impl<'a> ErrorPages<'a> {
    pub fn new(
        config: &'a Config,
        catalog: &'a dyn MessageCatalog,
        templates: &'a dyn TemplateSystem,
        globals: &'a GlobalContext,
    ) -> Self {
        Self {
            config,
            catalog,
            templates,
            globals,
            filters: None,
        }
    }

    /// Routes every generated task through `filters`.
    pub fn with_filters(mut self, filters: &'a FilterPipeline) -> Self {
        self.filters = Some(filters);
        self
    }

    /// The task grouping all error pages.
    pub fn group_task(&self) -> GroupTask {
        GroupTask {
            basename: BASENAME,
            doc: "Generates the error pages.",
        }
    }

    /// Tasks for the codes, languages and patterns of the configuration.
    pub fn tasks(&self) -> impl Iterator<Item = TaskDescriptor> + '_ {
        self.generate_tasks(
            &self.config.create_http_error_pages,
            self.config
                .translations
                .iter()
                .map(|(lang, subdir)| (lang.as_str(), subdir.as_str())),
            &self.config.http_error_page_output_pattern,
            &self.config.http_error_page_template_pattern,
        )
    }

    /// Yields one task per `(code, lang)` pair, codes in the outer loop.
    ///
    /// `translations` yields `(lang, output subdirectory)` pairs, languages
    /// are visited in the order it yields them.
    pub fn generate_tasks<'s, I>(
        &'s self,
        codes: &'s [u16],
        translations: I,
        output_pattern: &'s str,
        template_pattern: &'s str,
    ) -> impl Iterator<Item = TaskDescriptor> + 's
    where
        I: IntoIterator<Item = (&'s str, &'s str)> + Clone + 's,
    {
        codes.iter().flat_map(move |&code| {
            translations.clone().into_iter().map(move |(lang, subdir)| {
                let file = expand_pattern(output_pattern, code, lang);
                let destination = destination(&self.config.output_folder, subdir, &file);
                let template = expand_pattern(template_pattern, code, lang);

                self.prepare_error_page(destination, lang, code, template)
            })
        })
    }

    /// Resolves the page title, trying in order: a code-specific message, a
    /// translation of the reason phrase, the reason phrase itself.
    pub fn resolve_title(&self, lang: &str, code: u16) -> Option<String> {
        let key = format!("http-error-code-{code}");

        if let Some(title) = self.catalog.lookup(lang, &key) {
            return Some(title.into_owned());
        }

        reason_phrase(code).map(|phrase| {
            self.catalog
                .lookup(lang, phrase)
                .map_or_else(|| phrase.to_string(), |title| title.into_owned())
        })
    }

    fn prepare_error_page(
        &self,
        destination: camino::Utf8PathBuf,
        lang: &str,
        code: u16,
        template: String,
    ) -> TaskDescriptor {
        let context = RenderContext {
            http_error_code: code,
            http_error_message: reason_phrase(code),
            title: self.resolve_title(lang, code),
            lang: lang.to_string(),
        };

        let mut file_dep = self.templates.template_deps(&template);
        file_dep.extend(
            THEME_ASSETS
                .iter()
                .filter_map(|name| self.templates.asset_path(name)),
        );

        let uptodate = config_changed(self.fingerprint(&context), NAMESPACE);

        let task = TaskDescriptor {
            basename: BASENAME,
            name: normalize_path(&destination),
            targets: vec![destination.clone()],
            file_dep,
            actions: vec![Action::Render(RenderCall {
                template,
                destination,
                context,
                url_type: self.config.url_type.for_error_pages(),
            })],
            uptodate: vec![uptodate],
            clean: true,
        };

        tracing::debug!("prepared task {}:{}", task.basename, task.name);

        match self.filters {
            Some(filters) => filters.apply(task),
            None => task,
        }
    }

    /// Everything a rendered page for `context` could depend on.
    fn fingerprint(&self, context: &RenderContext) -> Fingerprint {
        let lang = context.lang.as_str();
        let mut map = context.to_map();

        map.insert(
            "OUTPUT_FOLDER".into(),
            Value::from(self.config.output_folder.as_str()),
        );
        map.insert(
            "TRANSLATIONS".into(),
            Value::Object(
                self.config
                    .translations
                    .iter()
                    .map(|(lang, dir)| (lang.clone(), Value::from(dir.as_str())))
                    .collect(),
            ),
        );
        map.insert(
            "global".into(),
            Value::Object(
                self.globals
                    .global
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        );

        for (name, items) in &self.globals.template_hooks {
            map.insert(
                format!("||template_hooks|{name}||"),
                Value::Array(items.clone()),
            );
        }

        for key in self.globals.translatable.keys() {
            map.insert(key.clone(), self.globals.translated(key, lang));
        }

        map.insert(
            "navigation_links".into(),
            self.globals.navigation_links(lang),
        );

        map
    }
}
