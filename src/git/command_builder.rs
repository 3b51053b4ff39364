//! Type-safe Git command builder for consistent command execution
//!
//! This module is the process executor of the updater: every git invocation
//! goes through [`GitCommand`], which
//!
//! - runs the platform git binary with the augmented `PATH` from
//!   [`crate::utils::platform::augmented_path`],
//! - bounds every invocation with a timeout and kills the child on expiry,
//! - forces the C locale so output markers can be matched reliably,
//! - disables interactive credential prompts, and
//! - converts failures into [`UpdateError::GitCommandError`] carrying the
//!   exit code and stderr, or [`UpdateError::GitTimeout`].
//!
//! Arguments are always passed to the child as separate argv entries, never
//! through a shell.
//!
//! # Examples
//!
//! ```rust,no_run
//! use git_autoupdate::git::command_builder::GitCommand;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let head = GitCommand::rev_parse("HEAD")
//!     .current_dir(Path::new("/path/to/repo"))
//!     .execute_stdout()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_LOCAL_TIMEOUT;
use crate::core::UpdateError;
use crate::utils::platform::{augmented_path, get_git_command};

/// Builder for a single git invocation.
///
/// New commands start with the local-query timeout ([`GIT_LOCAL_TIMEOUT`]),
/// captured output, and the caller's environment plus the augmented `PATH`.
pub struct GitCommand {
    /// Command arguments to pass to Git (e.g., ["fetch", "origin", "main"])
    args: Vec<String>,

    /// Working directory, passed to git as `-C <dir>`
    current_dir: Option<PathBuf>,

    /// Extra environment variables for the git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string included in log lines
    context: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(GIT_LOCAL_TIMEOUT),
            context: None,
        }
    }
}

impl GitCommand {
    /// Creates a new Git command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for Git command execution.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument to the Git command.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to the Git command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for the Git command execution.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g., "check" or "pull")
    ///
    /// With context, log messages include the identifier:
    /// ```text
    /// (check) Executing command: git -C /path/to/repo fetch autoupdate-1b2c main
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The git subcommand name, used in errors and perf logs.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    fn full_args(&self) -> Vec<String> {
        let mut full_args = Vec::with_capacity(self.args.len() + 2);
        if let Some(ref dir) = self.current_dir {
            // -C keeps git independent of the process's current directory
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        full_args
    }

    /// Execute the command and return the output
    ///
    /// # Errors
    ///
    /// - [`UpdateError::GitCommandError`] when git exits non-zero
    /// - [`UpdateError::GitTimeout`] when the deadline elapses (the child is killed)
    /// - an I/O error (with context) when the process cannot be spawned
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let full_args = self.full_args();
        let operation = self.operation();
        let prefix = self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default();

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args)
            .env("PATH", augmented_path())
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        tracing::debug!(
            target: "git",
            "{}Executing command: {} {}",
            prefix,
            git_command,
            full_args.join(" ")
        );

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
            } else {
                tracing::warn!(
                    target: "git",
                    "{}Command timed out after {} seconds: git {}",
                    prefix,
                    duration.as_secs(),
                    full_args.join(" ")
                );
                return Err(UpdateError::GitTimeout {
                    operation,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future
                .await
                .with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "{}Command failed with exit code: {:?}",
                prefix,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "{}Error: {}", prefix, stderr.trim());
            }

            // Some failures (e.g. merge conflicts) are reported on stdout only
            let message = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };

            return Err(UpdateError::GitCommandError {
                operation,
                exit_code: output.status.code(),
                stderr: message,
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "git", "{}{}", prefix, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}{}", prefix, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "git::perf", "{}Git {} took {:.2}s", prefix, operation, elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "git::perf", "{}Git {} took {}ms", prefix, operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and discard its output
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }

    /// Execute the command and report only whether it exited successfully
    ///
    /// For queries that answer through their exit status (`--is-ancestor`,
    /// `--version`). Any failure, including spawn errors and timeouts, is
    /// `false`.
    pub async fn execute_status(self) -> bool {
        self.execute().await.is_ok()
    }
}

/// Output from a Git command
#[derive(Debug, Clone)]
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for the git commands the updater uses

impl GitCommand {
    /// `git --version`
    pub fn version() -> Self {
        Self::new().arg("--version")
    }

    /// `git rev-parse --is-inside-work-tree`
    pub fn is_inside_work_tree() -> Self {
        Self::new().args(["rev-parse", "--is-inside-work-tree"])
    }

    /// Create a rev-parse command
    pub fn rev_parse(ref_name: &str) -> Self {
        Self::new().args(["rev-parse", ref_name])
    }

    /// Create a rev-parse command returning the abbreviated object name
    pub fn rev_parse_short(ref_name: &str) -> Self {
        Self::new().args(["rev-parse", "--short", ref_name])
    }

    /// Short name of the branch HEAD points at; fails when HEAD is detached
    pub fn current_branch() -> Self {
        Self::new().args(["symbolic-ref", "--short", "HEAD"])
    }

    /// Machine-readable status including untracked files
    pub fn status_porcelain() -> Self {
        Self::new().args(["status", "--porcelain"])
    }

    /// Exit status 0 iff `ancestor` is reachable from `descendant`
    pub fn is_ancestor(ancestor: &str, descendant: &str) -> Self {
        Self::new().args(["merge-base", "--is-ancestor", ancestor, descendant])
    }

    /// `git remote` (one name per line)
    pub fn list_remotes() -> Self {
        Self::new().arg("remote")
    }

    /// Create a command to add a named remote
    pub fn remote_add(name: &str, url: &str) -> Self {
        Self::new().args(["remote", "add", name, url])
    }

    /// Create a command to remove a named remote
    pub fn remote_remove(name: &str) -> Self {
        Self::new().args(["remote", "remove", name])
    }

    /// Fetch a single branch from a remote, updating `<remote>/<branch>`
    pub fn fetch_branch(remote: &str, branch: &str) -> Self {
        Self::new().args(["fetch", "--no-tags", remote, branch])
    }

    /// Fast-forward-only merge; never creates a merge commit or opens an editor
    pub fn merge_ff_only(reference: &str) -> Self {
        Self::new().args(["merge", "--ff-only", "--no-edit", reference])
    }
}
