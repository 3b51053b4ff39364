//! Error handling for git-autoupdate
//!
//! This module provides the error taxonomy of the updater and user-friendly
//! error reporting for the CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can classify a failure precisely
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`UpdateError`] - Enumerated failure cases for every update operation
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! - **Preconditions**: [`UpdateError::ToolUnavailable`], [`UpdateError::NotARepository`],
//!   [`UpdateError::InvalidUrl`], [`UpdateError::LocalChangesPresent`]
//! - **Upstream**: [`UpdateError::NetworkUnreachable`] (soft for checks)
//! - **Merge outcome**: [`UpdateError::DivergedBranches`], [`UpdateError::MergeConflict`],
//!   [`UpdateError::PullFailed`]
//! - **Process level**: [`UpdateError::GitCommandError`], [`UpdateError::GitTimeout`]
//! - **Everything else**: [`UpdateError::ConfigError`], [`UpdateError::Internal`]
//!
//! Update operations return [`anyhow::Result`]; typed errors travel inside the
//! `anyhow::Error` and are recovered with [`UpdateError::classify`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use git_autoupdate::core::{UpdateError, user_friendly_error};
//!
//! let error = anyhow::Error::from(UpdateError::ToolUnavailable);
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for update operations.
///
/// Each variant maps to one entry of the updater's error taxonomy. All
/// variants carry only owned strings so the type is cheap to clone into
/// response envelopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// Git executable not found, even on the augmented search path.
    #[error("Git is not installed or not found in PATH")]
    ToolUnavailable,

    /// The installation directory is not inside a git working tree.
    #[error("Installation directory is not a git repository: {path}")]
    NotARepository {
        /// The path that was expected to be a working tree
        path: String,
    },

    /// The configured upstream URL failed validation.
    #[error("Invalid update source URL: {url}")]
    InvalidUrl {
        /// The rejected URL (credentials stripped)
        url: String,
    },

    /// The working tree has modifications; pulling would be unsafe.
    #[error("Local changes present; commit or discard them before updating")]
    LocalChangesPresent,

    /// The upstream repository could not be reached.
    ///
    /// Non-fatal for checks: the message is embedded in the check result.
    #[error("Could not reach update source: {reason}")]
    NetworkUnreachable {
        /// Why the fetch failed
        reason: String,
    },

    /// Local history contains commits the upstream does not have.
    #[error("Local branch has diverged from upstream and cannot be fast-forwarded; resolve manually")]
    DivergedBranches {
        /// Raw git output
        reason: String,
    },

    /// The merge stopped on conflicting changes.
    #[error("Merge conflict while applying update; resolve manually")]
    MergeConflict {
        /// Raw git output
        reason: String,
    },

    /// Any other pull failure.
    #[error("Failed to pull updates: {reason}")]
    PullFailed {
        /// Raw git output
        reason: String,
    },

    /// A git process exited unsuccessfully.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git subcommand that failed (e.g. "fetch", "merge")
        operation: String,
        /// Exit code, absent when the process was killed by a signal
        exit_code: Option<i32>,
        /// The error output from the git command
        stderr: String,
    },

    /// A git process exceeded its deadline.
    #[error("Git {operation} timed out after {seconds} seconds")]
    GitTimeout {
        /// The git subcommand that timed out
        operation: String,
        /// The deadline that elapsed
        seconds: u64,
    },

    /// Settings could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Unexpected failure caught at an operation boundary.
    #[error("{message}")]
    Internal {
        /// Generic error message
        message: String,
    },
}

impl UpdateError {
    /// Stable machine-readable name of the variant, used in response envelopes.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ToolUnavailable => "ToolUnavailable",
            Self::NotARepository { .. } => "NotARepository",
            Self::InvalidUrl { .. } => "InvalidUrl",
            Self::LocalChangesPresent => "LocalChangesPresent",
            Self::NetworkUnreachable { .. } => "NetworkUnreachable",
            Self::DivergedBranches { .. } => "DivergedBranches",
            Self::MergeConflict { .. } => "MergeConflict",
            Self::PullFailed { .. } => "PullFailed",
            Self::GitCommandError { .. } => "GitCommandError",
            Self::GitTimeout { .. } => "GitTimeout",
            Self::ConfigError { .. } => "ConfigError",
            Self::Internal { .. } => "InternalError",
        }
    }

    /// HTTP-equivalent status code for the failure envelope.
    ///
    /// Client-correctable input maps to 4xx, environment problems to 5xx.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl { .. } => 400,
            Self::LocalChangesPresent
            | Self::DivergedBranches { .. }
            | Self::MergeConflict { .. } => 409,
            Self::NetworkUnreachable { .. } | Self::GitTimeout { .. } => 503,
            _ => 500,
        }
    }

    /// Recover the typed error carried by an [`anyhow::Error`].
    ///
    /// Walks the whole error chain so context layers added with
    /// `.context(...)` do not hide the typed cause. Anything untyped becomes
    /// [`UpdateError::Internal`] with the full chain as its message.
    #[must_use]
    pub fn classify(error: &anyhow::Error) -> Self {
        if let Some(typed) = error.chain().find_map(|cause| cause.downcast_ref::<Self>()) {
            return typed.clone();
        }
        Self::Internal {
            message: format_chain(error),
        }
    }

    /// Raw process output carried by the variant, if any.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::GitCommandError { stderr, .. } => Some(stderr),
            Self::NetworkUnreachable { reason }
            | Self::DivergedBranches { reason }
            | Self::MergeConflict { reason }
            | Self::PullFailed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Render an error and its causes as a single message.
fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

/// User-facing wrapper around an [`UpdateError`] with optional suggestion and details.
///
/// # Examples
///
/// ```rust,no_run
/// use git_autoupdate::core::{ErrorContext, UpdateError};
///
/// let context = ErrorContext::new(UpdateError::LocalChangesPresent)
///     .with_suggestion("Run 'git stash' in the installation directory")
///     .with_details("Fast-forward updates never touch modified files");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: UpdateError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: UpdateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with tailored suggestions.
///
/// Typed [`UpdateError`]s anywhere in the chain get variant-specific advice;
/// everything else is reported as an internal error with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    create_error_context(UpdateError::classify(&error))
}

fn create_error_context(error: UpdateError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<String>) = match &error {
        UpdateError::ToolUnavailable => (
            Some("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')".into()),
            Some("Updates are applied with the system git; it was not found on PATH or in the usual install locations".into()),
        ),
        UpdateError::NotARepository { path } => (
            Some(format!(
                "Reinstall from a git clone, or point --install-path at the clone (current: {path})"
            )),
            Some("Git-based updates only work for installations that are git working trees".into()),
        ),
        UpdateError::InvalidUrl { .. } => (
            Some("Use an https://, ssh://, git:// or git@host:path URL without spaces or shell characters, e.g. 'git-autoupdate config set --url <URL>'".into()),
            Some("The upstream URL is passed to git and must not contain characters usable for command injection".into()),
        ),
        UpdateError::LocalChangesPresent => (
            Some("Commit, stash, or discard your changes in the installation directory, then retry".into()),
            Some("Updates are fast-forward only and never stash or overwrite local modifications".into()),
        ),
        UpdateError::NetworkUnreachable { .. } | UpdateError::GitTimeout { .. } => (
            Some("Check your internet connection and access to the upstream repository, then try again later".into()),
            None,
        ),
        UpdateError::DivergedBranches { .. } => (
            Some("Rebase or reset your local commits onto upstream 'main' manually".into()),
            Some("The installation has commits that are not on the upstream branch".into()),
        ),
        UpdateError::MergeConflict { .. } => (
            Some("Resolve the conflicting files manually in the installation directory".into()),
            None,
        ),
        UpdateError::GitCommandError { stderr, .. } => (
            Some("Run the git command manually in the installation directory for more details".into()),
            Some(stderr.trim().to_string()).filter(|s| !s.is_empty()),
        ),
        UpdateError::ConfigError { .. } => (
            Some("Check the TOML syntax of the settings file, or delete it to restore defaults".into()),
            None,
        ),
        UpdateError::PullFailed { .. } | UpdateError::Internal { .. } => (None, None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
