//! Show or change the update settings.
//!
//! # Examples
//!
//! ```bash
//! git-autoupdate config show
//! git-autoupdate config path
//! git-autoupdate config set --enabled false
//! git-autoupdate config set --interval 30 --url git@github.com:owner/app.git
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::common::print_field;
use crate::config::AutoUpdateConfig;
use crate::git::{ensure_valid_update_url, strip_auth_from_url};

/// Command to manage the settings file.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show the effective settings (default).
    Show,

    /// Print the settings file location.
    Path,

    /// Change one or more settings.
    Set {
        /// Enable or disable periodic checks
        #[arg(long)]
        enabled: Option<bool>,

        /// Minutes between checks, clamped to 1..=60
        #[arg(long, value_name = "MINUTES")]
        interval: Option<u32>,

        /// Update source URL (https://, ssh://, git:// or git@host:path)
        #[arg(long)]
        url: Option<String>,
    },
}

impl ConfigCommand {
    /// Execute the config command against `config_path` or the default location.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let path = match config_path {
            Some(path) => path,
            None => AutoUpdateConfig::default_path()?,
        };

        match self.command.unwrap_or(ConfigSubcommands::Show) {
            ConfigSubcommands::Show => Self::show(&path).await,
            ConfigSubcommands::Path => {
                println!("{}", path.display());
                Ok(())
            }
            ConfigSubcommands::Set {
                enabled,
                interval,
                url,
            } => Self::set(&path, enabled, interval, url).await,
        }
    }

    async fn show(path: &Path) -> Result<()> {
        let config = AutoUpdateConfig::load_with_optional(Some(path.to_path_buf())).await?;

        println!("{}", "Update Settings".bold());
        print_field("location", path.display());
        if !path.exists() {
            print_field("note", "file not found, showing defaults".dimmed());
        }
        print_field("enabled", config.enabled);
        print_field("interval", format!("{} min", config.check_interval_minutes));
        print_field("upstream", strip_auth_from_url(&config.upstream_url));
        print_field("mechanism", config.mechanism.as_str());
        print_field("git timeout", format!("{}s", config.git_timeout_secs));
        print_field("fetch timeout", format!("{}s", config.network_timeout_secs));
        Ok(())
    }

    async fn set(
        path: &Path,
        enabled: Option<bool>,
        interval: Option<u32>,
        url: Option<String>,
    ) -> Result<()> {
        if enabled.is_none() && interval.is_none() && url.is_none() {
            anyhow::bail!("Nothing to set; pass --enabled, --interval or --url");
        }

        // Reject a bad URL before anything is written
        if let Some(url) = &url {
            ensure_valid_update_url(url)?;
        }

        let mut config = AutoUpdateConfig::load_with_optional(Some(path.to_path_buf())).await?;
        if let Some(enabled) = enabled {
            config.enabled = enabled;
        }
        if let Some(minutes) = interval {
            config.set_check_interval_minutes(minutes);
            if config.check_interval_minutes != minutes {
                println!(
                    "{} Interval clamped to {} minutes",
                    "⚠️ ".yellow(),
                    config.check_interval_minutes
                );
            }
        }
        if let Some(url) = url {
            config.upstream_url = url;
        }

        config.save_to(path).await?;
        println!("✅ Saved settings to {}", path.display());
        Ok(())
    }
}
