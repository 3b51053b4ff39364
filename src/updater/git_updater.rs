//! Git-based update mechanism.
//!
//! [`GitUpdater`] treats the installation as a git working tree tracking the
//! upstream `main` branch. Checks fetch upstream through a temporary remote
//! and compare revisions; pulls fast-forward the checked-out branch and
//! never create merge commits, stash, or overwrite local modifications.
//!
//! # Preconditions
//!
//! Check and pull fail fast, before any remote is added:
//!
//! 1. the upstream URL passes validation ([`UpdateError::InvalidUrl`]),
//! 2. git is available ([`UpdateError::ToolUnavailable`]),
//! 3. the install path is a working tree ([`UpdateError::NotARepository`]),
//! 4. pull only: the tree is clean ([`UpdateError::LocalChangesPresent`]).
//!
//! The URL is validated first so a rejected URL never reaches a process.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::broadcast;

use super::install_path::resolve_install_path;
use super::types::{CheckResult, InstallationInfo, PullResult, UpdateEvent};
use crate::config::AutoUpdateConfig;
use crate::constants::{ALREADY_UP_TO_DATE_MARKER, UPDATE_BRANCH};
use crate::core::UpdateError;
use crate::git::{
    GitCommandOutput, GitRepo, ensure_valid_update_url, is_git_installed, strip_auth_from_url,
    with_temporary_remote,
};

/// Capacity of the update event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Upstream state observed inside a check's remote scope.
struct Upstream {
    revision: String,
    revision_short: String,
    update_available: bool,
}

/// Update coordinator for git working-tree installations.
///
/// Holds a settings snapshot taken at construction. Every operation
/// re-derives repository state; nothing is cached between calls.
#[derive(Debug)]
pub struct GitUpdater {
    repo: GitRepo,
    config: AutoUpdateConfig,
    events: broadcast::Sender<UpdateEvent>,
}

impl GitUpdater {
    /// Create an updater for the installation at `install_path`.
    pub fn new(install_path: impl AsRef<Path>, config: AutoUpdateConfig) -> Self {
        let repo = GitRepo::new(install_path).with_timeout(config.git_timeout());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repo,
            config,
            events,
        }
    }

    /// Create an updater for the installation the running binary belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the running executable cannot be located.
    pub fn discover(config: AutoUpdateConfig) -> Result<Self> {
        Ok(Self::new(resolve_install_path()?, config))
    }

    /// Root of the installation.
    #[must_use]
    pub fn install_path(&self) -> &Path {
        self.repo.path()
    }

    /// The settings snapshot in use.
    #[must_use]
    pub const fn config(&self) -> &AutoUpdateConfig {
        &self.config
    }

    /// Receive an [`UpdateEvent`] after every successful pull.
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.events.subscribe()
    }

    /// Describe the installation.
    ///
    /// Never fails because git is missing, the install path is not a
    /// repository, or the repository has no commits yet; those yield info
    /// with the revision fields absent.
    pub async fn get_info(&self) -> Result<InstallationInfo> {
        let mut info = InstallationInfo {
            install_path: self.install_path().to_path_buf(),
            current_version: None,
            current_version_short: None,
            current_branch: None,
            has_local_changes: false,
            source_url: self.config.upstream_url.clone(),
            auto_update_enabled: self.config.enabled,
            check_interval_minutes: self.config.check_interval_minutes,
            mechanism_info: self.mechanism_info(),
        };

        if !is_git_installed().await {
            tracing::debug!(target: "updater", "git not available; reporting bare info");
            return Ok(info);
        }
        if !self.repo.is_repository().await {
            tracing::debug!(
                target: "updater",
                "{} is not a repository; reporting bare info",
                self.install_path().display()
            );
            return Ok(info);
        }

        // An unborn HEAD leaves both revisions absent
        info.current_version = self.repo.current_revision().await.ok();
        info.current_version_short = self.repo.short_revision().await.ok();
        info.current_branch = self.repo.current_branch().await;
        info.has_local_changes = self.repo.has_uncommitted_changes().await;
        Ok(info)
    }

    /// Compare the installation with upstream `main`.
    ///
    /// Failing to reach upstream is not an error: the result carries the
    /// failure in `error` with the remote fields unset.
    ///
    /// # Errors
    ///
    /// Precondition failures: [`UpdateError::InvalidUrl`],
    /// [`UpdateError::ToolUnavailable`], [`UpdateError::NotARepository`].
    pub async fn check_for_updates(&self) -> Result<CheckResult> {
        self.ensure_preconditions().await?;

        let (local, local_short) = self.local_revision().await?;
        tracing::info!(
            target: "updater",
            "Checking {} for updates to {local_short}",
            strip_auth_from_url(&self.config.upstream_url)
        );

        let mut result = CheckResult {
            update_available: false,
            local_version: local.clone(),
            local_version_short: local_short,
            remote_version: None,
            remote_version_short: None,
            source_url: self.config.upstream_url.clone(),
            install_path: self.install_path().to_path_buf(),
            error: None,
        };

        match self.query_upstream(local).await {
            Ok(upstream) => {
                tracing::info!(
                    target: "updater",
                    "Upstream at {}, update available: {}",
                    upstream.revision_short,
                    upstream.update_available
                );
                result.update_available = upstream.update_available;
                result.remote_version = Some(upstream.revision);
                result.remote_version_short = Some(upstream.revision_short);
            }
            Err(e) => {
                let unreachable = unreachable_error(&e);
                tracing::warn!(target: "updater", "{unreachable}");
                result.error = Some(unreachable.to_string());
            }
        }

        Ok(result)
    }

    /// Fast-forward the installation to upstream `main`.
    ///
    /// # Errors
    ///
    /// The check preconditions plus [`UpdateError::LocalChangesPresent`];
    /// [`UpdateError::PullFailed`] when the fetch fails or times out;
    /// [`UpdateError::DivergedBranches`], [`UpdateError::MergeConflict`] or
    /// [`UpdateError::PullFailed`] when the merge fails.
    pub async fn pull_updates(&self) -> Result<PullResult> {
        self.ensure_preconditions().await?;
        if self.repo.has_uncommitted_changes().await {
            return Err(UpdateError::LocalChangesPresent.into());
        }

        let (previous, previous_short) = self.local_revision().await?;
        tracing::info!(
            target: "updater",
            "Pulling {} into {previous_short}",
            strip_auth_from_url(&self.config.upstream_url)
        );

        let repo = self.repo.clone();
        let network_timeout = self.config.network_timeout();
        let merge = with_temporary_remote(&self.repo, &self.config.upstream_url, |remote| async move {
            repo.fetch_branch(&remote, UPDATE_BRANCH, network_timeout)
                .await
                .map_err(|e| anyhow::Error::from(fetch_failure(&e)))?;
            repo.merge_ff_only(&format!("{remote}/{UPDATE_BRANCH}"), network_timeout)
                .await
                .map_err(|e| anyhow::Error::from(classify_merge_failure(&e)))
        })
        .await?;

        let (new, new_short) = self.local_revision().await?;
        let already_up_to_date = merge_reported_up_to_date(&merge) || previous == new;

        let message = if already_up_to_date {
            format!("Already up to date at {new_short}")
        } else {
            format!("Updated from {previous_short} to {new_short}")
        };
        tracing::info!(target: "updater", "{message}");

        let event = UpdateEvent::Pulled {
            new_version: new.clone(),
            already_up_to_date,
        };
        if self.events.send(event).is_err() {
            tracing::trace!(target: "updater", "No update event subscribers");
        }

        Ok(PullResult {
            success: true,
            previous_version: previous,
            previous_version_short: previous_short,
            new_version: new,
            new_version_short: new_short,
            already_up_to_date,
            message,
        })
    }

    async fn ensure_preconditions(&self) -> Result<()> {
        ensure_valid_update_url(&self.config.upstream_url)?;
        if !is_git_installed().await {
            return Err(UpdateError::ToolUnavailable.into());
        }
        if !self.repo.is_repository().await {
            return Err(UpdateError::NotARepository {
                path: self.install_path().display().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Full and short revision of `HEAD`.
    ///
    /// A repository without commits has no revision to compare or update
    /// from; that surfaces as [`UpdateError::Internal`] carrying git's output.
    async fn local_revision(&self) -> Result<(String, String)> {
        let resolved = async {
            Ok::<_, anyhow::Error>((
                self.repo.current_revision().await?,
                self.repo.short_revision().await?,
            ))
        };
        resolved.await.map_err(|e| {
            UpdateError::Internal {
                message: format!("Cannot resolve the installed revision: {}", failure_detail(&e)),
            }
            .into()
        })
    }

    /// Fetch upstream and compare it with `local`, all inside one remote scope.
    async fn query_upstream(&self, local: String) -> Result<Upstream> {
        let repo = self.repo.clone();
        let network_timeout = self.config.network_timeout();

        with_temporary_remote(&self.repo, &self.config.upstream_url, |remote| async move {
            repo.fetch_branch(&remote, UPDATE_BRANCH, network_timeout).await?;

            let tracking = format!("{remote}/{UPDATE_BRANCH}");
            let revision = repo.revision_of(&tracking).await?;
            let revision_short = repo.short_revision_of(&tracking).await?;

            // Diverged and locally-ahead histories both fail the ancestry test
            let update_available = local != revision && repo.is_ancestor(&local, &revision).await;

            Ok(Upstream {
                revision,
                revision_short,
                update_available,
            })
        })
        .await
    }

    fn mechanism_info(&self) -> BTreeMap<String, serde_json::Value> {
        BTreeMap::from([
            ("mechanism".to_string(), self.config.mechanism.as_str().into()),
            ("branch".to_string(), UPDATE_BRANCH.into()),
            ("fastForwardOnly".to_string(), true.into()),
        ])
    }
}

/// git's own output for a failure, or the error message when there is none.
fn failure_detail(error: &anyhow::Error) -> String {
    let typed = UpdateError::classify(error);
    match &typed {
        UpdateError::GitTimeout { .. } => typed.to_string(),
        other => other
            .raw_output()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map_or_else(|| other.to_string(), str::to_string),
    }
}

/// Describe a failed upstream query as [`UpdateError::NetworkUnreachable`].
fn unreachable_error(error: &anyhow::Error) -> UpdateError {
    UpdateError::NetworkUnreachable {
        reason: failure_detail(error),
    }
}

/// Classify a fetch failure during a pull.
fn fetch_failure(error: &anyhow::Error) -> UpdateError {
    UpdateError::PullFailed {
        reason: format!("fetch from update source failed: {}", failure_detail(error)),
    }
}

/// Classify a failed `merge --ff-only`.
fn classify_merge_failure(error: &anyhow::Error) -> UpdateError {
    let typed = UpdateError::classify(error);
    if matches!(typed, UpdateError::GitTimeout { .. }) {
        return UpdateError::PullFailed {
            reason: typed.to_string(),
        };
    }
    let raw = typed.raw_output().map_or_else(|| typed.to_string(), str::to_string);
    classify_merge_output(&raw)
}

/// Map git's merge failure output to an error variant.
pub(crate) fn classify_merge_output(raw: &str) -> UpdateError {
    let lower = raw.to_lowercase();
    let reason = raw.trim().to_string();

    if lower.contains("not possible to fast-forward")
        || lower.contains("can't be fast-forwarded")
        || lower.contains("cannot be fast-forwarded")
    {
        UpdateError::DivergedBranches {
            reason,
        }
    } else if lower.contains("conflict") {
        UpdateError::MergeConflict {
            reason,
        }
    } else {
        UpdateError::PullFailed {
            reason,
        }
    }
}

/// Whether git said the merge was a no-op ("Already up to date." or the
/// older "Already up-to-date.").
fn merge_reported_up_to_date(output: &GitCommandOutput) -> bool {
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    combined.to_lowercase().replace('-', " ").contains(ALREADY_UP_TO_DATE_MARKER)
}
