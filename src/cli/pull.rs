//! Apply upstream updates.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{CommandContext, print_envelope};
use crate::updater::UpdateMechanism;

/// Fast-forward the installation to upstream.
#[derive(Args)]
pub struct PullCommand {
    /// Print the response envelope as JSON
    #[arg(long)]
    json: bool,
}

impl PullCommand {
    /// Execute the pull command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config).await?;
        let result = ctx.updater.pull().await;

        if self.json {
            return print_envelope(result);
        }

        let pulled = result?;
        if pulled.already_up_to_date {
            println!("{} {}", "✓".green(), pulled.message);
        } else {
            println!("{} {}", "✅".green(), pulled.message);
            println!("   Restart the application to use the new version.");
        }
        Ok(())
    }
}
