//! Update coordination for git-autoupdate.
//!
//! This module turns the git primitives into the three public operations:
//! describe the installation, check upstream for new commits, and pull them.
//!
//! # Architecture Overview
//!
//! - **[`UpdateMechanism`]**: capability trait with `info`, `check` and `pull`
//! - **[`GitUpdater`]**: the git working-tree implementation
//! - **[`Updater`]**: the mechanism chosen by the `mechanism` setting
//! - **[`ApiResponse`]**: the success/failure envelope every operation returns
//!
//! ## Operation Flow
//!
//! ```text
//! 1. Preconditions (fail fast, no remote touched)
//!    ├── upstream URL valid
//!    ├── git available
//!    ├── install path is a working tree
//!    └── pull only: working tree clean
//!
//! 2. Temporary remote scope (autoupdate-<uuid>)
//!    ├── fetch main
//!    ├── check: rev-parse + merge-base --is-ancestor
//!    └── pull:  merge --ff-only
//!
//! 3. Remote removed on every exit path
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use git_autoupdate::config::AutoUpdateConfig;
//! use git_autoupdate::updater::{UpdateMechanism, Updater};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let updater = Updater::from_config("/opt/my-app", AutoUpdateConfig::load().await?);
//! let response = updater.check_response().await;
//! if let Some(result) = response.result {
//!     println!("update available: {}", result.update_available);
//! }
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod git_updater;
pub mod install_path;
pub mod types;

use anyhow::Result;
use std::future::Future;
use std::path::Path;
use tokio::sync::broadcast;

pub use envelope::ApiResponse;
pub use git_updater::GitUpdater;
pub use install_path::{find_install_root, resolve_install_path};
pub use types::{CheckResult, InstallationInfo, PullResult, UpdateEvent};

use crate::config::{AutoUpdateConfig, MechanismKind};

/// A source of updates for an installation.
///
/// The `*_response` methods wrap the raw operations in an [`ApiResponse`],
/// converting every error into a failure envelope.
pub trait UpdateMechanism: Sync {
    /// Name of the mechanism, as written in the settings file.
    fn name(&self) -> &'static str;

    /// Describe the installation.
    fn info(&self) -> impl Future<Output = Result<InstallationInfo>> + Send;

    /// Compare the installation with upstream.
    fn check(&self) -> impl Future<Output = Result<CheckResult>> + Send;

    /// Apply upstream changes.
    fn pull(&self) -> impl Future<Output = Result<PullResult>> + Send;

    /// [`info`](Self::info) wrapped in an envelope.
    fn info_response(&self) -> impl Future<Output = ApiResponse<InstallationInfo>> + Send {
        async move { ApiResponse::from_result(self.info().await) }
    }

    /// [`check`](Self::check) wrapped in an envelope.
    fn check_response(&self) -> impl Future<Output = ApiResponse<CheckResult>> + Send {
        async move { ApiResponse::from_result(self.check().await) }
    }

    /// [`pull`](Self::pull) wrapped in an envelope.
    fn pull_response(&self) -> impl Future<Output = ApiResponse<PullResult>> + Send {
        async move { ApiResponse::from_result(self.pull().await) }
    }
}

impl UpdateMechanism for GitUpdater {
    fn name(&self) -> &'static str {
        MechanismKind::Git.as_str()
    }

    fn info(&self) -> impl Future<Output = Result<InstallationInfo>> + Send {
        self.get_info()
    }

    fn check(&self) -> impl Future<Output = Result<CheckResult>> + Send {
        self.check_for_updates()
    }

    fn pull(&self) -> impl Future<Output = Result<PullResult>> + Send {
        self.pull_updates()
    }
}

/// The update mechanism selected by configuration.
#[derive(Debug)]
pub enum Updater {
    /// Fast-forward a git working tree.
    Git(GitUpdater),
}

impl Updater {
    /// Build the mechanism named by `config.mechanism` for `install_path`.
    pub fn from_config(install_path: impl AsRef<Path>, config: AutoUpdateConfig) -> Self {
        match config.mechanism {
            MechanismKind::Git => Self::Git(GitUpdater::new(install_path, config)),
        }
    }

    /// Build the configured mechanism for the running binary's installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the running executable cannot be located.
    pub fn discover(config: AutoUpdateConfig) -> Result<Self> {
        Ok(Self::from_config(resolve_install_path()?, config))
    }

    /// Receive an [`UpdateEvent`] after every successful pull.
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        match self {
            Self::Git(git) => git.subscribe(),
        }
    }

    /// Root of the installation.
    #[must_use]
    pub fn install_path(&self) -> &Path {
        match self {
            Self::Git(git) => git.install_path(),
        }
    }
}

impl UpdateMechanism for Updater {
    fn name(&self) -> &'static str {
        match self {
            Self::Git(git) => git.name(),
        }
    }

    fn info(&self) -> impl Future<Output = Result<InstallationInfo>> + Send {
        match self {
            Self::Git(git) => git.info(),
        }
    }

    fn check(&self) -> impl Future<Output = Result<CheckResult>> + Send {
        match self {
            Self::Git(git) => git.check(),
        }
    }

    fn pull(&self) -> impl Future<Output = Result<PullResult>> + Send {
        match self {
            Self::Git(git) => git.pull(),
        }
    }
}
