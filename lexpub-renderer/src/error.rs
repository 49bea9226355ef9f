//! Error types for lexpub-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// YAML serialization error (metadata document).
    #[error("metadata serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// The deed has no translation into the requested language. Callers skip
    /// the document; every other variant is fatal.
    #[error("invalid language '{language}' for {url}: deed has no translation")]
    MissingTranslation { language: String, url: String },
}

impl RenderError {
    pub fn is_missing_translation(&self) -> bool {
        matches!(self, RenderError::MissingTranslation { .. })
    }
}
