#![forbid(unsafe_code)]
// The README example renders through `JinjaTemplates`.
#![cfg_attr(feature = "minijinja", doc = include_str!("../README.md"))]
#![cfg_attr(
    not(feature = "minijinja"),
    doc = "Localized HTTP error pages for static website generators."
)]

mod catalog;
mod config;
mod context;
mod error;
pub mod filter;
pub mod fingerprint;
mod generator;
pub mod output;
mod status;
pub mod task;
pub mod template;
#[cfg(feature = "logging")]
mod utils;

pub use crate::catalog::{MessageCatalog, Messages};
pub use crate::config::{Config, UrlType};
pub use crate::context::{GlobalContext, RenderContext};
pub use crate::error::*;
pub use crate::filter::{ExtensionFilter, Filter, FilterPipeline};
pub use crate::fingerprint::{ConfigChanged, config_changed};
pub use crate::generator::{ErrorPages, NAMESPACE};
pub use crate::status::{STATUS_CODES, reason_phrase};
pub use crate::task::{Action, GroupTask, RenderCall, TaskDescriptor, TaskResult};
#[cfg(feature = "minijinja")]
pub use crate::template::JinjaTemplates;
pub use crate::template::{Renderer, TemplateSystem};
#[cfg(feature = "logging")]
pub use crate::utils::init_logging;
