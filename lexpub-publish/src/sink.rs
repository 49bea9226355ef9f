//! Version-controlled output sink.
//!
//! [`OutputSink`] is the narrow git surface the branch synchronizer needs.
//! [`GitSink`] implements it with `git2` for local repository work and the
//! `git` binary for network operations (fetch/push), so the user's
//! credential helpers and SSH setup apply unchanged.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{
    build::CheckoutBuilder, BranchType, Commit, ErrorCode, IndexAddOption, Oid, Repository,
    StatusOptions,
};

use lexpub_core::types::BranchName;

use crate::error::{io_err, PublishError};

/// Git operations used by the publisher.
pub trait OutputSink {
    /// Root of the working tree, for diagnostics.
    fn workdir(&self) -> &Path;

    /// Make `branch` the checked-out branch, creating it when needed.
    fn checkout_branch(&mut self, branch: &BranchName) -> Result<(), PublishError>;

    /// `true` when the working tree has staged, unstaged or untracked changes.
    fn is_dirty(&self) -> Result<bool, PublishError>;

    /// Stage every change under `pathspec` (relative to the repository root)
    /// and commit it on the current branch.
    fn commit_all(&mut self, pathspec: &Path, message: &str) -> Result<(), PublishError>;

    /// Push `branch` to its upstream.
    fn push(&mut self, branch: &BranchName) -> Result<(), PublishError>;
}

// ---------------------------------------------------------------------------
// GitSink
// ---------------------------------------------------------------------------

/// [`OutputSink`] over a non-bare git repository.
pub struct GitSink {
    repo: Repository,
    workdir: PathBuf,
    remote: String,
    default_branch: String,
}

impl GitSink {
    /// Open the repository at `path`.
    pub fn open(
        path: &Path,
        remote: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let repo = Repository::open(path)?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| git2::Error::from_str("bare repository has no working directory"))?;
        Ok(GitSink {
            repo,
            workdir,
            remote: remote.into(),
            default_branch: default_branch.into(),
        })
    }

    fn has_remote(&self) -> Result<bool, PublishError> {
        match self.repo.find_remote(&self.remote) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn branch_oid(&self, name: &str, kind: BranchType) -> Result<Option<Oid>, PublishError> {
        match self.repo.find_branch(name, kind) {
            Ok(branch) => Ok(branch.get().target()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_branch_oid(&self, name: &str) -> Result<Option<Oid>, PublishError> {
        self.branch_oid(&format!("{}/{}", self.remote, name), BranchType::Remote)
    }

    /// Starting point for a brand new branch: the remote default branch, the
    /// local default branch, then HEAD. `None` on an unborn repository.
    fn base_oid(&self) -> Result<Option<Oid>, PublishError> {
        if let Some(oid) = self.remote_branch_oid(&self.default_branch)? {
            return Ok(Some(oid));
        }
        if let Some(oid) = self.branch_oid(&self.default_branch, BranchType::Local)? {
            return Ok(Some(oid));
        }
        match self.repo.head() {
            Ok(head) => Ok(head.target()),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>, PublishError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Run `git <args>` in the working tree.
    fn git(&self, args: &[&str]) -> Result<String, PublishError> {
        tracing::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output()
            .map_err(|e| io_err(&self.workdir, e))?;
        if !output.status.success() {
            return Err(PublishError::GitCommand {
                repository: self.workdir.clone(),
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OutputSink for GitSink {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn checkout_branch(&mut self, branch: &BranchName) -> Result<(), PublishError> {
        let name = branch.0.as_str();
        let has_remote = self.has_remote()?;
        if has_remote {
            self.git(&["fetch", self.remote.as_str()])?;
        }

        let local = self.branch_oid(name, BranchType::Local)?;
        let remote = if has_remote {
            self.remote_branch_oid(name)?
        } else {
            None
        };

        let target = match (local, remote) {
            (Some(local), Some(remote)) if local != remote => {
                if self.repo.graph_descendant_of(remote, local)? {
                    tracing::debug!("fast-forwarding {name} to {}/{name}", self.remote);
                    Some(remote)
                } else {
                    Some(local)
                }
            }
            (Some(local), _) => Some(local),
            (None, Some(remote)) => Some(remote),
            (None, None) => self.base_oid()?,
        };

        let refname = format!("refs/heads/{name}");
        match target {
            Some(oid) => {
                let commit = self.repo.find_commit(oid)?;
                let mut checkout = CheckoutBuilder::new();
                checkout.safe();
                self.repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
                self.repo
                    .reference(&refname, oid, true, &format!("lexpub: checkout {name}"))?;
                self.repo.set_head(&refname)?;
            }
            // Unborn repository: the first commit creates the branch.
            None => self.repo.set_head(&refname)?,
        }

        if remote.is_some() {
            let mut local_branch = self.repo.find_branch(name, BranchType::Local)?;
            local_branch.set_upstream(Some(&format!("{}/{}", self.remote, name)))?;
        }
        tracing::debug!("checked out {name}");
        Ok(())
    }

    fn is_dirty(&self) -> Result<bool, PublishError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    fn commit_all(&mut self, pathspec: &Path, message: &str) -> Result<(), PublishError> {
        let spec = match pathspec.to_string_lossy().replace('\\', "/") {
            s if s.is_empty() || s == "." => "*".to_string(),
            s => s,
        };

        let mut index = self.repo.index()?;
        index.add_all([spec.as_str()], IndexAddOption::DEFAULT, None)?;
        index.update_all([spec.as_str()], None)?;
        index.write()?;
        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;

        let signature = self.repo.signature()?;
        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        tracing::info!("committed {oid}: {message}");
        Ok(())
    }

    fn push(&mut self, branch: &BranchName) -> Result<(), PublishError> {
        self.git(&["push", "--set-upstream", self.remote.as_str(), branch.0.as_str()])?;
        tracing::info!("pushed {branch} to {}", self.remote);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
