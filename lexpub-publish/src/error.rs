//! Error types for lexpub-publish.

use std::path::PathBuf;

use thiserror::Error;

use lexpub_core::error::{CatalogError, ConfigError};
use lexpub_renderer::RenderError;

/// All errors that can arise from a publish run. None of them are retried.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error from the rendering engine (never `MissingTranslation` for
    /// deeds; those are skipped).
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The static asset directory has not been built.
    #[error("static source directory {path} does not exist, build static assets first")]
    StaticRootMissing { path: PathBuf },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// A `git` subprocess (fetch/push) exited unsuccessfully.
    #[error("`git {args}` failed in {repository}: {stderr}")]
    GitCommand {
        repository: PathBuf,
        args: String,
        stderr: String,
    },

    /// The working tree still had changes right after committing everything
    /// under the output directory. Nothing is pushed.
    #[error("repository {repository} is dirty after commit; refusing to continue")]
    DirtyAfterCommit { repository: PathBuf },
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
