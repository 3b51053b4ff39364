//! Scoped throwaway remote for talking to the update source.
//!
//! Every operation that needs upstream objects adds a remote, fetches through
//! it and removes it again. [`with_temporary_remote`] is the single primitive
//! for that sequence: the remote never outlives the call, whether the body
//! succeeds, fails, or the whole future is dropped mid-flight.
//!
//! Remote names are unique per scope (`autoupdate-<uuid>`), so concurrent
//! operations on one installation never touch each other's remote.

use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::runtime::{Handle, RuntimeFlavor};
use uuid::Uuid;

use super::{GitCommand, GitRepo};
use crate::constants::TEMP_REMOTE_PREFIX;
use crate::utils::platform::{augmented_path, get_git_command};

/// A remote that exists only for the lifetime of this value.
///
/// Prefer [`with_temporary_remote`]; the handle is public so callers that
/// need the remote across several steps can hold it explicitly. Call
/// [`release`](Self::release) when done. If the handle is dropped without
/// being released, the remote is removed synchronously in `Drop`.
#[derive(Debug)]
pub struct TemporaryRemote {
    repo_path: PathBuf,
    name: String,
    released: bool,
}

impl TemporaryRemote {
    /// Generate a fresh remote name, `autoupdate-<uuid>`.
    #[must_use]
    pub fn unique_name() -> String {
        format!("{TEMP_REMOTE_PREFIX}-{}", Uuid::new_v4().simple())
    }

    /// Add a uniquely named remote pointing at `url`.
    ///
    /// The URL must already have passed validation.
    pub async fn add(repo: &GitRepo, url: &str) -> Result<Self> {
        let name = Self::unique_name();

        // Best effort; absence is the normal case
        if GitCommand::remote_remove(&name).current_dir(repo.path()).execute_success().await.is_ok()
        {
            tracing::debug!(target: "git", "Removed stale remote {name}");
        }

        GitCommand::remote_add(&name, url)
            .current_dir(repo.path())
            .execute_success()
            .await
            .with_context(|| format!("Failed to add temporary remote {name}"))?;

        tracing::debug!(target: "git", "Added temporary remote {name}");

        Ok(Self {
            repo_path: repo.path().to_path_buf(),
            name,
            released: false,
        })
    }

    /// Name of the remote.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote-tracking ref for `branch` after a fetch, e.g. `autoupdate-1f2e/main`.
    #[must_use]
    pub fn tracking_ref(&self, branch: &str) -> String {
        format!("{}/{branch}", self.name)
    }

    /// Remove the remote. Failures are logged and swallowed.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = GitCommand::remote_remove(&self.name)
            .current_dir(&self.repo_path)
            .execute_success()
            .await
        {
            tracing::warn!(target: "git", "Failed to remove temporary remote {}: {e}", self.name);
        } else {
            tracing::debug!(target: "git", "Removed temporary remote {}", self.name);
        }
    }
}

impl Drop for TemporaryRemote {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        // Async cleanup is impossible here; block on a plain process instead
        tracing::debug!(target: "git", "Removing temporary remote {} on drop", self.name);
        let remove = || {
            std::process::Command::new(get_git_command())
                .arg("-C")
                .arg(&self.repo_path)
                .args(["remote", "remove", &self.name])
                .env("PATH", augmented_path())
                .env("LC_ALL", "C")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        };

        // Hand the worker's other tasks off while the process runs; the
        // current-thread runtime does not support that
        let status = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(remove)
            }
            _ => remove(),
        };

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => {
                tracing::warn!(target: "git", "Removing temporary remote {} exited with {status}", self.name);
            }
            Err(e) => {
                tracing::warn!(target: "git", "Failed to remove temporary remote {}: {e}", self.name);
            }
        }
    }
}

/// Run `body` with a temporary remote pointing at `url`.
///
/// `body` receives the remote's name. The remote is removed on every exit
/// path; a failure to remove it is logged and never replaces the result of
/// `body`.
///
/// # Errors
///
/// Returns the error from adding the remote, or whatever `body` returns.
///
/// # Examples
///
/// ```rust,no_run
/// use git_autoupdate::git::{GitCommand, GitRepo, with_temporary_remote};
///
/// # async fn example() -> anyhow::Result<()> {
/// let repo = GitRepo::new("/opt/my-app");
/// let tip = with_temporary_remote(&repo, "https://github.com/owner/app.git", |remote| async move {
///     GitCommand::fetch_branch(&remote, "main").current_dir("/opt/my-app").execute_success().await?;
///     GitCommand::rev_parse(&format!("{remote}/main")).current_dir("/opt/my-app").execute_stdout().await
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_temporary_remote<T, F, Fut>(repo: &GitRepo, url: &str, body: F) -> Result<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let remote = TemporaryRemote::add(repo, url).await?;
    let result = body(remote.name().to_string()).await;
    remote.release().await;
    result
}
