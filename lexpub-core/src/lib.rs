//! lexpub core library: catalog types, catalog loading, configuration, errors.
//!
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`CatalogError`], [`ConfigError`]
//! - [`catalog`]: load / open-branch and validity-group queries
//! - [`config`]: `publish.yaml` loading and validation

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use config::PublishConfig;
pub use error::{CatalogError, ConfigError};
pub use types::{
    BranchName, Catalog, Category, DocumentKind, LegalCode, TranslationBranch,
};
