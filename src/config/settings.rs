//! Auto-update settings.
//!
//! The settings file is the only state the updater persists. Every
//! coordinator call receives a snapshot of it; nothing here is cached
//! between calls.
//!
//! # File Location
//!
//! - **Unix/macOS**: `~/.git-autoupdate/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\git-autoupdate\config.toml`
//!
//! The location can be overridden using the `GIT_AUTOUPDATE_CONFIG_PATH`
//! environment variable.
//!
//! # File Format
//!
//! ```toml
//! enabled = true
//! check_interval_minutes = 15
//! upstream_url = "https://github.com/owner/app.git"
//! mechanism = "git"
//! git_timeout_secs = 30
//! network_timeout_secs = 120
//! ```
//!
//! Every key is optional; missing keys take their defaults and a missing
//! file is the same as an empty one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_CHECK_INTERVAL_MINUTES, DEFAULT_UPSTREAM_URL, GIT_LOCAL_TIMEOUT,
    GIT_NETWORK_TIMEOUT, MAX_CHECK_INTERVAL_MINUTES, MIN_CHECK_INTERVAL_MINUTES,
};
use crate::core::UpdateError;
use crate::utils::fs::atomic_write;
use crate::utils::platform::get_home_dir;

/// Which update mechanism serves info, check and pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanismKind {
    /// Fast-forward the installation's git working tree from upstream `main`.
    #[default]
    Git,
}

impl MechanismKind {
    /// Name used in the settings file and in `mechanismInfo`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
        }
    }
}

/// Persisted auto-update settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoUpdateConfig {
    /// Whether periodic checks are enabled.
    ///
    /// # Default: `true`
    pub enabled: bool,

    /// Minutes between periodic checks, clamped to `1..=60` on load.
    ///
    /// # Default: `15`
    pub check_interval_minutes: u32,

    /// The update source. Validated before every use, not on load, so a bad
    /// value surfaces as `InvalidUrl` from the operation that needs it.
    pub upstream_url: String,

    /// Update mechanism.
    ///
    /// # Default: `git`
    pub mechanism: MechanismKind,

    /// Timeout for local git queries, in seconds.
    pub git_timeout_secs: u64,

    /// Timeout for fetch and merge, in seconds.
    pub network_timeout_secs: u64,
}

impl Default for AutoUpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_minutes: DEFAULT_CHECK_INTERVAL_MINUTES,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            mechanism: MechanismKind::default(),
            git_timeout_secs: GIT_LOCAL_TIMEOUT.as_secs(),
            network_timeout_secs: GIT_NETWORK_TIMEOUT.as_secs(),
        }
    }
}

impl AutoUpdateConfig {
    /// Load settings from the default location.
    ///
    /// Returns defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from an optional path, falling back to [`load`](Self::load).
    ///
    /// A given path that does not exist yields defaults, like the default
    /// location does.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path).await,
            Some(_) => Ok(Self::default()),
            None => Self::load().await,
        }
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Parse failures are reported as [`UpdateError::ConfigError`].
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| UpdateError::ConfigError {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;

        Ok(config.normalized())
    }

    /// Save settings to the default location.
    pub async fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path).await
    }

    /// Save settings to a specific file, creating parent directories.
    ///
    /// The write is atomic; readers see either the old or the new file.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Settings file location, honoring `GIT_AUTOUPDATE_CONFIG_PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("git-autoupdate")
        } else {
            get_home_dir()?.join(".git-autoupdate")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Clamp out-of-range values into their accepted ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.check_interval_minutes = clamp_interval(self.check_interval_minutes);
        self.git_timeout_secs = self.git_timeout_secs.max(1);
        self.network_timeout_secs = self.network_timeout_secs.max(1);
        self
    }

    /// Set the check interval, clamped to `1..=60` minutes.
    pub fn set_check_interval_minutes(&mut self, minutes: u32) {
        self.check_interval_minutes = clamp_interval(minutes);
    }

    /// Interval between periodic checks.
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(u64::from(clamp_interval(self.check_interval_minutes)) * 60)
    }

    /// Deadline for local git queries.
    #[must_use]
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs.max(1))
    }

    /// Deadline for fetch and merge.
    #[must_use]
    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs.max(1))
    }
}

fn clamp_interval(minutes: u32) -> u32 {
    minutes.clamp(MIN_CHECK_INTERVAL_MINUTES, MAX_CHECK_INTERVAL_MINUTES)
}
