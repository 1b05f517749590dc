use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read the configuration file.\n{0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Couldn't parse the configuration.\n{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Couldn't read the message catalog.\n{0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Couldn't parse the message catalog.\n{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[cfg(feature = "minijinja")]
    #[error("Couldn't render template '{0}':\n{1}")]
    Template(String, minijinja::Error),

    #[error("Couldn't write '{0}':\n{1}")]
    Write(camino::Utf8PathBuf, std::io::Error),
}
