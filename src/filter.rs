//! Output filters: transforms applied to every task before it is scheduled.

use std::borrow::Cow;
use std::sync::Arc;

use camino::Utf8Path;
use glob::Pattern;

use crate::task::{Action, FilterCall, FilterFn, TaskDescriptor, TaskResult};

/// Transforms a task descriptor before it reaches the orchestrator.
pub trait Filter: Send + Sync {
    fn apply(&self, task: TaskDescriptor) -> TaskDescriptor;
}

impl<F> Filter for F
where
    F: Fn(TaskDescriptor) -> TaskDescriptor + Send + Sync,
{
    fn apply(&self, task: TaskDescriptor) -> TaskDescriptor {
        self(task)
    }
}

/// Ordered list of filters every generated task is routed through.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn apply(&self, task: TaskDescriptor) -> TaskDescriptor {
        self.filters
            .iter()
            .fold(task, |task, filter| filter.apply(task))
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FilterPipeline({})", self.filters.len())
    }
}

/// Appends post-processing commands to tasks whose targets match.
///
/// A target matches when its lowercased extension (with the leading dot,
/// e.g. `.html`) is one of the configured extensions, or when its path
/// matches one of the configured glob patterns.
///
/// ```
/// use errorpages::ExtensionFilter;
///
/// let filter = ExtensionFilter::new([".html"])
///     .command("minify", |_path| Ok(()));
/// ```
#[derive(Default)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
    patterns: Vec<Pattern>,
    commands: Vec<(Cow<'static, str>, FilterFn)>,
}

impl ExtensionFilter {
    pub fn new<S>(extensions: impl IntoIterator<Item = S>) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
            ..Default::default()
        }
    }

    /// Also match targets against a glob pattern.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.patterns.push(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn command<F>(mut self, name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Utf8Path) -> TaskResult<()> + Send + Sync + 'static,
    {
        self.commands.push((name.into(), Arc::new(func)));
        self
    }

    fn matches(&self, target: &Utf8Path) -> bool {
        let ext = target
            .extension()
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        self.extensions.contains(&ext)
            || self
                .patterns
                .iter()
                .any(|pattern| pattern.matches(target.as_str()))
    }
}

impl Filter for ExtensionFilter {
    fn apply(&self, mut task: TaskDescriptor) -> TaskDescriptor {
        let targets: Vec<_> = task
            .targets
            .iter()
            .filter(|target| self.matches(target))
            .cloned()
            .collect();

        for target in targets {
            for (name, func) in &self.commands {
                task.actions.push(Action::Filter(FilterCall {
                    name: name.clone(),
                    target: target.clone(),
                    func: func.clone(),
                }));
            }
        }

        task
    }
}

impl std::fmt::Debug for ExtensionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionFilter")
            .field("extensions", &self.extensions)
            .field("patterns", &self.patterns)
            .field(
                "commands",
                &self.commands.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
