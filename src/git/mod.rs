//! Git operations wrapper for git-autoupdate
//!
//! This module provides an async wrapper around the system `git` command.
//! Like Cargo's `git-fetch-with-cli`, the updater deliberately uses the
//! installed git binary instead of an embedded implementation, so SSH
//! agents, credential helpers and the user's git configuration work exactly
//! as they do on the command line.
//!
//! # Components
//!
//! - [`command_builder`] - the process executor ([`GitCommand`])
//! - [`GitRepo`] - queries and fast-forward updates of a working tree
//! - [`temp_remote`] - the scoped throwaway remote used to talk to upstream
//! - [`url`] - upstream URL validation and credential stripping
//!
//! # Degrading checks
//!
//! The boolean checks ([`is_git_installed`], [`GitRepo::is_repository`],
//! [`GitRepo::has_uncommitted_changes`], [`GitRepo::is_ancestor`]) never
//! return errors. A missing tool or a directory that is not a repository is
//! an expected state for an installation, so these answer `false` instead.
//!
//! # Usage
//!
//! ```rust,no_run
//! use git_autoupdate::git::{GitRepo, is_git_installed};
//!
//! # async fn example() -> anyhow::Result<()> {
//! if is_git_installed().await {
//!     let repo = GitRepo::new("/opt/my-app");
//!     if repo.is_repository().await {
//!         println!("at {}", repo.short_revision().await?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod command_builder;
pub mod temp_remote;
pub mod url;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::GIT_LOCAL_TIMEOUT;
use crate::utils::platform::{command_exists, get_git_command};

pub use command_builder::{GitCommand, GitCommandOutput};
pub use temp_remote::{TemporaryRemote, with_temporary_remote};
pub use url::{ensure_valid_update_url, is_valid_update_url, strip_auth_from_url};

/// Checks if Git is installed and responds to `git --version`.
///
/// Resolution uses the augmented search path, so a git installed by
/// Homebrew or in Program Files is found even from a GUI-launched process.
pub async fn is_git_installed() -> bool {
    command_exists(get_git_command()) && GitCommand::version().execute_status().await
}

/// Handle to a local working tree.
///
/// Constructing a `GitRepo` does not touch the filesystem. Use
/// [`is_repository`](Self::is_repository) before running queries that
/// require a working tree.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
    timeout: Duration,
}

impl GitRepo {
    /// Creates a handle for the working tree at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout: GIT_LOCAL_TIMEOUT,
        }
    }

    /// Sets the deadline applied to every query made through this handle.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points `cmd` at this repository with this handle's deadline.
    fn git(&self, cmd: GitCommand) -> GitCommand {
        cmd.current_dir(&self.path).with_timeout(Some(self.timeout))
    }

    /// Returns the path of the working tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff `path` is inside a git working tree.
    pub async fn is_repository(&self) -> bool {
        if !self.path.is_dir() {
            return false;
        }
        self.git(GitCommand::is_inside_work_tree())
            .execute_stdout()
            .await
            .is_ok_and(|out| out == "true")
    }

    /// Full object name of the checked-out commit.
    pub async fn current_revision(&self) -> Result<String> {
        self.git(GitCommand::rev_parse("HEAD"))
            .execute_stdout()
            .await
            .context("Failed to get current commit")
    }

    /// Abbreviated object name of the checked-out commit.
    pub async fn short_revision(&self) -> Result<String> {
        self.short_revision_of("HEAD").await
    }

    /// Full object name `reference` resolves to.
    pub async fn revision_of(&self, reference: &str) -> Result<String> {
        self.git(GitCommand::rev_parse(reference))
            .execute_stdout()
            .await
            .with_context(|| format!("Failed to resolve '{reference}'"))
    }

    /// Abbreviated object name `reference` resolves to.
    pub async fn short_revision_of(&self, reference: &str) -> Result<String> {
        self.git(GitCommand::rev_parse_short(reference))
            .execute_stdout()
            .await
            .with_context(|| format!("Failed to resolve short name of '{reference}'"))
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached.
    pub async fn current_branch(&self) -> Option<String> {
        match self.git(GitCommand::current_branch()).execute_stdout().await {
            Ok(branch) if !branch.is_empty() => Some(branch),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(target: "git", "No symbolic HEAD in {}: {e}", self.path.display());
                None
            }
        }
    }

    /// True iff the working tree has tracked or untracked modifications.
    ///
    /// A failed status query is reported as `false`.
    pub async fn has_uncommitted_changes(&self) -> bool {
        match self.git(GitCommand::status_porcelain()).execute().await {
            Ok(output) => !output.stdout.trim().is_empty(),
            Err(e) => {
                tracing::debug!(target: "git", "Status query failed in {}: {e}", self.path.display());
                false
            }
        }
    }

    /// True iff `ancestor` is reachable from `descendant`.
    ///
    /// `git merge-base --is-ancestor` answers through its exit status; every
    /// non-zero exit (not an ancestor, unknown object, timeout) is `false`.
    pub async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        self.git(GitCommand::is_ancestor(ancestor, descendant))
            .execute_status()
            .await
    }

    /// Names of the configured remotes.
    pub async fn remotes(&self) -> Result<Vec<String>> {
        let output = self
            .git(GitCommand::list_remotes())
            .execute_stdout()
            .await
            .context("Failed to list remotes")?;
        Ok(output.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
    }

    /// Fetch `branch` from `remote` into `<remote>/<branch>`.
    ///
    /// Uses `timeout` instead of the handle's local-query deadline.
    pub async fn fetch_branch(&self, remote: &str, branch: &str, timeout: Duration) -> Result<()> {
        GitCommand::fetch_branch(remote, branch)
            .current_dir(&self.path)
            .with_timeout(Some(timeout))
            .execute_success()
            .await
    }

    /// Fast-forward the checked-out branch to `reference`.
    ///
    /// Never creates a merge commit. Returns git's output so callers can
    /// tell a no-op merge from an advance.
    pub async fn merge_ff_only(&self, reference: &str, timeout: Duration) -> Result<GitCommandOutput> {
        GitCommand::merge_ff_only(reference)
            .current_dir(&self.path)
            .with_timeout(Some(timeout))
            .execute()
            .await
    }
}
