//! Describe the installation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{CommandContext, or_unknown, print_envelope, print_field};
use crate::updater::{InstallationInfo, UpdateMechanism};

/// Show the installed revision, branch, local changes and update settings.
#[derive(Args)]
pub struct InfoCommand {
    /// Print the response envelope as JSON
    #[arg(long)]
    json: bool,
}

impl InfoCommand {
    /// Execute the info command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config).await?;
        let result = ctx.updater.info().await;

        if self.json {
            return print_envelope(result);
        }

        print_info(&result?);
        Ok(())
    }
}

fn print_info(info: &InstallationInfo) {
    println!("{}", "Installation".bold());
    print_field("path", info.install_path.display());

    match (&info.current_version_short, &info.current_version) {
        (Some(short), Some(full)) => print_field("revision", format!("{} ({full})", short.cyan())),
        _ => print_field("revision", "not a git installation".yellow()),
    }
    print_field("branch", or_unknown(info.current_branch.as_deref()));

    let changes = if info.has_local_changes {
        "yes".yellow()
    } else {
        "no".green()
    };
    print_field("local changes", changes);

    println!("\n{}", "Updates".bold());
    print_field("source", &info.source_url);
    print_field(
        "auto update",
        if info.auto_update_enabled {
            "enabled".green()
        } else {
            "disabled".red()
        },
    );
    print_field("interval", format!("{} min", info.check_interval_minutes));

    for (key, value) in &info.mechanism_info {
        print_field(key, value);
    }
}
