//! Declarative build tasks handed to the orchestrator.

use std::borrow::Cow;
use std::fmt::Debug;
use std::fs;
use std::sync::Arc;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};

use crate::config::UrlType;
use crate::context::RenderContext;
use crate::fingerprint::ConfigChanged;
use crate::template::Renderer;

/// Name shared by all error page tasks.
pub const BASENAME: &str = "errorpages";

/// Result from a single executed task.
pub type TaskResult<T> = anyhow::Result<T, anyhow::Error>;

/// Post-processing step run on a freshly rendered file.
pub type FilterFn = Arc<dyn Fn(&Utf8Path) -> TaskResult<()> + Send + Sync>;

/// Umbrella task grouping all error pages, so the orchestrator can build
/// them together by [`BASENAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTask {
    pub basename: &'static str,
    pub doc: &'static str,
}

/// One unit of work: render one error page for one language.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub basename: &'static str,
    /// Unique within [`basename`](Self::basename), the normalized target path.
    pub name: Utf8PathBuf,
    pub targets: Vec<Utf8PathBuf>,
    /// Files which trigger a rebuild when modified.
    pub file_dep: Vec<Utf8PathBuf>,
    pub actions: Vec<Action>,
    pub uptodate: Vec<ConfigChanged>,
    /// Remove the targets when cleaning.
    pub clean: bool,
}

impl TaskDescriptor {
    /// Whether the stored keys of a previous run still match, pairwise, the
    /// task's up-to-date checks.
    pub fn is_uptodate(&self, previous: &[String]) -> bool {
        self.uptodate.len() == previous.len()
            && self
                .uptodate
                .iter()
                .zip(previous)
                .all(|(uptodate, key)| uptodate.check(Some(key)))
    }

    /// Runs all actions in order, stopping at the first failure.
    pub fn run(&self, renderer: &dyn Renderer) -> TaskResult<()> {
        let span = tracing::info_span!("task", name = %self.name);
        let _enter = span.enter();

        for action in &self.actions {
            action.run(renderer)?;
        }

        Ok(())
    }

    /// The render call, always the first action.
    pub fn render_call(&self) -> Option<&RenderCall> {
        match self.actions.first() {
            Some(Action::Render(call)) => Some(call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Render(RenderCall),
    Filter(FilterCall),
}

impl Action {
    fn run(&self, renderer: &dyn Renderer) -> TaskResult<()> {
        match self {
            Action::Render(call) => renderer.render(
                &call.template,
                &call.destination,
                &call.context,
                call.url_type,
            ),
            Action::Filter(call) => call.run(),
        }
    }
}

/// Captured arguments of a [`Renderer::render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub template: String,
    pub destination: Utf8PathBuf,
    pub context: RenderContext,
    pub url_type: Option<UrlType>,
}

#[derive(Clone)]
pub struct FilterCall {
    pub name: Cow<'static, str>,
    pub target: Utf8PathBuf,
    pub(crate) func: FilterFn,
}

impl FilterCall {
    fn run(&self) -> TaskResult<()> {
        let is_link = fs::symlink_metadata(&self.target)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);

        if is_link {
            tracing::debug!("skipping filter {} on symlink {}", self.name, self.target);
            return Ok(());
        }

        (self.func)(&self.target)
            .with_context(|| format!("Filter '{}' failed on {}", self.name, self.target))
    }
}

impl Debug for FilterCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FilterCall({}, {})", self.name, self.target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::fingerprint::{Fingerprint, config_changed};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Renderer for Recorder {
        fn render(
            &self,
            template: &str,
            destination: &Utf8Path,
            context: &RenderContext,
            url_type: Option<UrlType>,
        ) -> anyhow::Result<()> {
            if template == "missing.tmpl" {
                anyhow::bail!("Template '{template}' not found");
            }

            self.calls.lock().unwrap().push(format!(
                "{template} {destination} {} {:?}",
                context.http_error_code, url_type
            ));
            Ok(())
        }
    }

    fn filter_call<F>(name: &'static str, target: &str, func: F) -> FilterCall
    where
        F: Fn(&Utf8Path) -> TaskResult<()> + Send + Sync + 'static,
    {
        FilterCall {
            name: name.into(),
            target: target.into(),
            func: Arc::new(func),
        }
    }

    fn descriptor(template: &str, actions: Vec<Action>) -> TaskDescriptor {
        let destination = Utf8PathBuf::from("out/404.html");
        let mut all = vec![Action::Render(RenderCall {
            template: template.into(),
            destination: destination.clone(),
            context: RenderContext {
                http_error_code: 404,
                http_error_message: Some("Not Found"),
                title: None,
                lang: "en".into(),
            },
            url_type: Some(UrlType::FullPath),
        })];
        all.extend(actions);

        TaskDescriptor {
            basename: BASENAME,
            name: destination.clone(),
            targets: vec![destination],
            file_dep: vec![],
            actions: all,
            uptodate: vec![config_changed(Fingerprint::new(), "test")],
            clean: true,
        }
    }

    #[test]
    fn test_run_actions_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let filter_log = log.clone();
        let task = descriptor(
            "404.tmpl",
            vec![Action::Filter(filter_call("minify", "out/404.html", move |path| {
                filter_log.lock().unwrap().push(path.to_string());
                Ok(())
            }))],
        );

        let renderer = Recorder::default();
        task.run(&renderer).unwrap();

        assert_eq!(
            *renderer.calls.lock().unwrap(),
            vec!["404.tmpl out/404.html 404 Some(FullPath)"]
        );
        assert_eq!(*log.lock().unwrap(), vec!["out/404.html"]);
        assert_eq!(task.render_call().unwrap().template, "404.tmpl");
    }

    #[test]
    fn test_run_stops_on_render_error() {
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        let task = descriptor(
            "missing.tmpl",
            vec![Action::Filter(filter_call("minify", "out/404.html", move |_| {
                *flag.lock().unwrap() = true;
                Ok(())
            }))],
        );

        let err = task.run(&Recorder::default()).unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn test_filter_error_names_filter() {
        let task = descriptor(
            "404.tmpl",
            vec![Action::Filter(filter_call("tidy", "out/404.html", |_| {
                anyhow::bail!("boom")
            }))],
        );

        let err = task.run(&Recorder::default()).unwrap_err();
        assert_eq!(err.to_string(), "Filter 'tidy' failed on out/404.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_filter_skips_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.html");
        let link = dir.path().join("404.html");
        fs::write(&real, "").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let link = Utf8PathBuf::from_path_buf(link).unwrap();
        let call = filter_call("fail", link.as_str(), |_| anyhow::bail!("should not run"));

        assert!(call.run().is_ok());
    }

    #[test]
    fn test_is_uptodate() {
        let task = descriptor("404.tmpl", vec![]);
        let key = task.uptodate[0].key();

        assert!(task.is_uptodate(&[key]));
        assert!(!task.is_uptodate(&["stale".to_string()]));
        assert!(!task.is_uptodate(&[]));
    }
}
