//! git-autoupdate - keep a git-based installation current
//!
//! An installation that is a clone of its upstream repository can update
//! itself by fast-forwarding to the upstream `main` branch. This crate
//! provides the coordinator for that: it describes the installation, checks
//! whether upstream has commits the installation can fast-forward to, and
//! applies them, without ever creating merge commits or touching local
//! modifications.
//!
//! # Architecture Overview
//!
//! ```text
//! caller ─► updater (info / check / pull)
//!              ├── preconditions: URL valid, git present, repository, clean tree
//!              ├── git::temp_remote: add autoupdate-<uuid>, always removed
//!              ├── git::GitRepo: revisions, branch, dirty state, ancestry
//!              └── git::command_builder: every git process, with timeouts
//! ```
//!
//! ## Key Features
//!
//! - **Fast-forward only**: an update either advances the branch pointer or
//!   fails with a classified error (diverged, conflict, other)
//! - **Injection-safe**: the upstream URL is validated before it reaches git,
//!   and arguments never pass through a shell
//! - **Leak-free**: the temporary remote is removed on success, failure and
//!   cancellation; names are unique per call
//! - **Bounded**: every git invocation has a deadline
//! - **Structured results**: camelCase records inside a success/failure
//!   envelope carrying an HTTP-equivalent status
//!
//! # Core Modules
//!
//! - [`updater`] - The coordinator and the [`updater::UpdateMechanism`] trait
//! - [`git`] - Git process execution, repository queries, temporary remotes, URL validation
//! - [`config`] - Persisted update settings (`~/.git-autoupdate/config.toml`)
//! - [`core`] - Error taxonomy and user-facing error reporting
//! - [`cli`] - The `git-autoupdate` command-line interface
//! - [`utils`] - Platform search paths and atomic file writes
//! - [`constants`] - Timeouts, reserved names and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use git_autoupdate::config::AutoUpdateConfig;
//! use git_autoupdate::updater::GitUpdater;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let updater = GitUpdater::discover(AutoUpdateConfig::load().await?)?;
//!
//! let check = updater.check_for_updates().await?;
//! if check.update_available {
//!     let pulled = updater.pull_updates().await?;
//!     println!("{}", pulled.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod updater;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
