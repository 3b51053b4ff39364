//! git-autoupdate CLI entry point
//!
//! Parses arguments, runs the command, and renders failures with
//! suggestions. Any failure exits with status 1.
//!
//! - `info` - Describe the installation
//! - `check` - Check upstream for a fast-forward update
//! - `pull` - Apply the update
//! - `config` - Show or change settings

use anyhow::Result;
use clap::Parser;
use git_autoupdate::cli;
use git_autoupdate::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
