//! Branch synchronizer.
//!
//! ```text
//! checkout -> clean + distill + legacy copy -> dirty? -> commit -> dirty? -> push
//! ```
//!
//! A rebuild that leaves the working tree clean is reported as
//! [`BranchOutcome::Unchanged`] and never committed. A tree that is still
//! dirty after committing everything under the output directory is fatal and
//! nothing is pushed.

use lexpub_core::{
    catalog,
    config::PublishConfig,
    types::{BranchName, Catalog},
};
use lexpub_renderer::Renderer;

use crate::cleaner::clean_output_dir;
use crate::distill::{distill, DistillReport};
use crate::error::PublishError;
use crate::legacy;
use crate::sink::OutputSink;

/// Message used for every publish commit.
pub const COMMIT_MESSAGE: &str = "Updated built HTML files";

/// What happened to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Files were rebuilt without touching git.
    LocalOnly,
    /// The rebuild produced no change; nothing was committed.
    Unchanged,
    Committed { pushed: bool },
}

/// Result of publishing one branch (or the local-only rebuild).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReport {
    /// `None` for a local-only rebuild.
    pub branch: Option<BranchName>,
    pub outcome: BranchOutcome,
    pub distill: DistillReport,
}

/// Rebuilds the output tree and publishes it to translation branches.
pub struct Publisher {
    config: PublishConfig,
    renderer: Renderer,
}

impl Publisher {
    /// Validate `config` and compile the templates.
    ///
    /// Fails before anything is rendered when the output directory is not
    /// inside the repository.
    pub fn new(config: PublishConfig) -> Result<Self, PublishError> {
        config.ensure_output_inside_repository()?;
        let renderer = Renderer::with_templates(config.templates_dir.as_deref())?;
        Ok(Publisher { config, renderer })
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Read the catalog from the current working tree.
    pub fn load_catalog(&self) -> Result<Catalog, PublishError> {
        Ok(catalog::load_at(&self.config.catalog_path)?)
    }

    /// Clean the output tree, render every document and copy legacy assets.
    pub fn distill_and_copy(&self) -> Result<DistillReport, PublishError> {
        let static_root = &self.config.static_root;
        if !static_root.is_dir() {
            return Err(PublishError::StaticRootMissing {
                path: static_root.clone(),
            });
        }
        let catalog = self.load_catalog()?;

        let output_dir = &self.config.output_dir;
        clean_output_dir(output_dir)?;
        let mut report = distill(&self.renderer, &catalog, output_dir)?;
        let copied = legacy::copy_all(&self.config.legacy_dir, output_dir)?;
        report.legacy_files_copied = copied.files;
        report.symlinks_created += copied.symlinks;
        Ok(report)
    }

    /// Rebuild the output tree in whatever branch is checked out.
    pub fn publish_local(&self) -> Result<BranchReport, PublishError> {
        let distill = self.distill_and_copy()?;
        Ok(BranchReport {
            branch: None,
            outcome: BranchOutcome::LocalOnly,
            distill,
        })
    }

    /// Check out `branch`, rebuild, and commit (and push) any change.
    pub fn publish_branch<S: OutputSink>(
        &self,
        sink: &mut S,
        branch: &BranchName,
        push: bool,
    ) -> Result<BranchReport, PublishError> {
        tracing::info!("Publishing branch {branch}");
        sink.checkout_branch(branch)?;
        let distill = self.distill_and_copy()?;

        let outcome = if !sink.is_dirty()? {
            tracing::info!("{branch}: nothing to commit");
            BranchOutcome::Unchanged
        } else {
            sink.commit_all(&self.config.output_relpath(), COMMIT_MESSAGE)?;
            if sink.is_dirty()? {
                return Err(PublishError::DirtyAfterCommit {
                    repository: sink.workdir().to_path_buf(),
                });
            }
            if push {
                sink.push(branch)?;
            }
            BranchOutcome::Committed { pushed: push }
        };

        Ok(BranchReport {
            branch: Some(branch.clone()),
            outcome,
            distill,
        })
    }

    /// Publish every open translation branch, in catalog order.
    pub fn publish_all<S: OutputSink>(
        &self,
        sink: &mut S,
        push: bool,
    ) -> Result<Vec<BranchReport>, PublishError> {
        let branches = catalog::list_open_branches(&self.load_catalog()?);
        tracing::info!(
            "Checking and updating build dirs for {} translation branches",
            branches.len()
        );
        branches
            .iter()
            .map(|branch| self.publish_branch(sink, branch, push))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
