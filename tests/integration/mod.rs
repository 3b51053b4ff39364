//! Integration test suite for git-autoupdate
//!
//! End-to-end tests against real git repositories laid out in temporary
//! directories by [`git_autoupdate::test_utils::UpdateFixture`]. No network
//! access is needed: the fixture upstream URL is rewritten to a local bare
//! repository by git itself.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **info**: Installation description
//! - **check**: Update detection, including unreachable upstreams
//! - **pull**: Fast-forward updates and their failure modes
//! - **remotes**: Temporary remote cleanup across all operations
//! - **cli**: The `git-autoupdate` binary and its JSON envelopes

mod check;
mod cli;
mod info;
mod pull;
mod remotes;

use git_autoupdate::test_utils::UpdateFixture;

/// Remotes on the installation that look like temporary update remotes.
pub fn leftover_update_remotes(fixture: &UpdateFixture) -> Vec<String> {
    fixture
        .install
        .remotes()
        .unwrap()
        .into_iter()
        .filter(|name| name.starts_with("autoupdate-"))
        .collect()
}
