//! Error types for lexpub-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading the content catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The catalog YAML file did not exist at the expected path.
    #[error("catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },
}

/// All errors that can arise while loading or validating `publish.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No `--config` given and none of the default locations exist.
    #[error("no configuration file found (looked in: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// The distill directory must live inside the data repository so that
    /// its contents can be committed.
    #[error(
        "distill_dir must be inside data_repository_dir, but distill_dir={output_dir} \
         is outside data_repository_dir={repository_dir}"
    )]
    OutputOutsideRepository {
        output_dir: PathBuf,
        repository_dir: PathBuf,
    },

    /// `std::env::current_dir()` failed while resolving relative paths.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
