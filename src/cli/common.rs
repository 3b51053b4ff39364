//! Common utilities for CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use super::CliConfig;
use crate::config::AutoUpdateConfig;
use crate::core::UpdateError;
use crate::updater::{ApiResponse, Updater};

/// Updater shared by the update commands.
pub struct CommandContext {
    /// Mechanism selected by the settings snapshot
    pub updater: Updater,
}

impl CommandContext {
    /// Load settings and build the configured updater.
    ///
    /// # Errors
    /// Returns an error if the settings file cannot be parsed or the
    /// installation cannot be located.
    pub async fn load(config: &CliConfig) -> Result<Self> {
        let settings = AutoUpdateConfig::load_with_optional(config.config_path.clone()).await?;
        let updater = match &config.install_path {
            Some(path) => Updater::from_config(path, settings),
            None => Updater::discover(settings)?,
        };
        tracing::debug!("Installation root: {}", updater.install_path().display());

        Ok(Self {
            updater,
        })
    }
}

/// Print the envelope for `result` as pretty JSON on stdout.
///
/// Failures are printed too and then returned so the process exits non-zero.
pub fn print_envelope<T: Serialize>(result: Result<T>) -> Result<()> {
    match result {
        Ok(value) => print_json(&ApiResponse::ok(value)),
        Err(e) => {
            print_json(&ApiResponse::<T>::failure(&UpdateError::classify(&e)))?;
            Err(e)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{json}");
    Ok(())
}

/// Print an aligned `label: value` line.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{:>16} {}", format!("{label}:").bold(), value);
}

/// Render an optional value, dimmed when absent.
pub fn or_unknown(value: Option<&str>) -> String {
    value.map_or_else(|| "unknown".dimmed().to_string(), str::to_string)
}
