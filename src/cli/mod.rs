//! Command-line interface for git-autoupdate.
//!
//! # Available Commands
//!
//! - `info` - Describe the installation and its update settings
//! - `check` - Ask upstream whether a fast-forward update is available
//! - `pull` - Fast-forward the installation to upstream `main`
//! - `config` - Show or change the update settings
//!
//! `info`, `check` and `pull` accept `--json`, which prints the response
//! envelope (`{ success, result | error, errorKind, status }`) instead of
//! colored text. The process exits with status 1 whenever the envelope is a
//! failure.
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (debug / error; default warn)
//! - `--config <PATH>` - settings file (also `GIT_AUTOUPDATE_CONFIG_PATH`)
//! - `--install-path <PATH>` - installation root (also `GIT_AUTOUPDATE_INSTALL_PATH`)
//!
//! # Examples
//!
//! ```bash
//! git-autoupdate info
//! git-autoupdate check --json
//! git-autoupdate --verbose pull
//! git-autoupdate config set --interval 30 --url https://github.com/owner/app.git
//! ```

mod check;
pub mod common;
mod config;
mod info;
mod pull;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::{CONFIG_PATH_ENV, INSTALL_PATH_ENV};

/// Runtime configuration for CLI execution.
///
/// Built from the global flags so tests can construct it directly.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset.
    ///
    /// `None` keeps logging off entirely.
    pub log_level: Option<String>,

    /// Settings file to use instead of the default location.
    pub config_path: Option<PathBuf>,

    /// Installation root to use instead of discovery.
    pub install_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by the flags. Calling
    /// this more than once is harmless.
    pub fn init_logging(&self) {
        let filter = match (std::env::var("RUST_LOG"), &self.log_level) {
            (Ok(_), _) => EnvFilter::from_default_env(),
            (Err(_), Some(level)) => EnvFilter::new(level),
            (Err(_), None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }
}

/// Git-based auto-update for source installations.
#[derive(Parser)]
#[command(
    name = "git-autoupdate",
    about = "Check for and apply fast-forward updates to a git-based installation",
    version,
    long_about = "git-autoupdate keeps a source installation current by fetching its upstream \
                  'main' branch through a temporary remote and fast-forwarding the working tree."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the settings file.
    #[arg(long, global = true, env = CONFIG_PATH_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Root of the installation to update.
    #[arg(long, global = true, env = INSTALL_PATH_ENV, value_name = "PATH")]
    install_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installed revision, branch, local changes and update settings.
    Info(info::InfoCommand),

    /// Check whether upstream has commits the installation can fast-forward to.
    Check(check::CheckCommand),

    /// Fast-forward the installation to upstream.
    Pull(pull::PullCommand),

    /// Show or change the update settings.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// - `--verbose` → `debug`
    /// - `--quiet` → `error`
    /// - otherwise → `warn`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
            install_path: self.install_path.clone(),
        }
    }

    /// Execute the CLI with a specific configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Info(cmd) => cmd.execute(&config).await,
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::Pull(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
