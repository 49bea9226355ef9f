//! Shared publish entrypoint used by the CLI.

use lexpub_core::{
    catalog,
    config::PublishConfig,
    types::{BranchName, TranslationBranch},
};

use crate::error::PublishError;
use crate::publisher::{BranchReport, Publisher};
use crate::sink::GitSink;

/// Scope for a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishScope {
    /// Publish every open translation branch.
    All,
    /// Publish a single named branch.
    Branch(BranchName),
    /// Rebuild the output tree without touching git.
    LocalOnly,
}

/// Run the publish pipeline for a scope.
///
/// `push` is ignored for [`PublishScope::LocalOnly`].
pub fn run(
    config: PublishConfig,
    scope: PublishScope,
    push: bool,
) -> Result<Vec<BranchReport>, PublishError> {
    let publisher = Publisher::new(config)?;
    if scope == PublishScope::LocalOnly {
        return Ok(vec![publisher.publish_local()?]);
    }

    let config = publisher.config();
    let mut sink = GitSink::open(
        &config.repository_dir,
        config.remote.clone(),
        config.default_branch.clone(),
    )?;
    match scope {
        PublishScope::Branch(name) => Ok(vec![publisher.publish_branch(&mut sink, &name, push)?]),
        _ => publisher.publish_all(&mut sink, push),
    }
}

/// Open translation branches from the configured catalog, in catalog order.
pub fn open_branches(config: &PublishConfig) -> Result<Vec<TranslationBranch>, PublishError> {
    let catalog = catalog::load_at(&config.catalog_path)?;
    Ok(catalog::open_branches(&catalog).cloned().collect())
}
