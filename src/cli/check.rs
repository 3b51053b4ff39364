//! Check upstream for updates.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{CommandContext, print_envelope};
use crate::updater::{CheckResult, UpdateMechanism};

/// Check whether upstream has commits the installation can fast-forward to.
#[derive(Args)]
pub struct CheckCommand {
    /// Print the response envelope as JSON
    #[arg(long)]
    json: bool,
}

impl CheckCommand {
    /// Execute the check command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config).await?;
        let result = ctx.updater.check().await;

        if self.json {
            return print_envelope(result);
        }

        print_check(&result?);
        Ok(())
    }
}

fn print_check(result: &CheckResult) {
    if let Some(error) = &result.error {
        println!("{} {error}", "⚠️ ".yellow());
        println!("   Try again later.");
        return;
    }

    let remote = result.remote_version_short.as_deref().unwrap_or_default();
    if result.update_available {
        println!(
            "{} Update available: {} → {}",
            "⬆".green(),
            result.local_version_short.cyan(),
            remote.green()
        );
        println!("   Run 'git-autoupdate pull' to apply it.");
    } else if result.local_version_short == remote {
        println!("{} Up to date at {}", "✓".green(), result.local_version_short.cyan());
    } else {
        println!(
            "{} No fast-forward update from {} (upstream at {})",
            "✓".green(),
            result.local_version_short.cyan(),
            remote
        );
    }
}
