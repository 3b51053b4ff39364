//! Test utilities for git-autoupdate
//!
//! This module provides utilities for writing tests, including helpers for
//! driving git in test repositories and ready-made update scenarios.
//!
//! # Test Isolation
//!
//! Every fixture lives in its own temporary directory and talks to git only
//! through repository-local configuration, so tests can run in parallel
//! without touching the user's global git setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use git_autoupdate::test_utils::UpdateFixture;
//!
//! let fixture = UpdateFixture::new().unwrap();
//! fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();
//! assert!(fixture.install_path().join("README.md").exists());
//! ```

pub mod fixtures;
pub mod git_helper;

pub use fixtures::{FIXTURE_UPSTREAM_URL, UNREACHABLE_UPSTREAM_URL, UpdateFixture};
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// This function initializes the tracing subscriber for tests, but only once
/// regardless of how many times it's called. It respects the `RUST_LOG` environment
/// variable if set, or uses the provided log level.
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=git=debug,updater=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // No logging if neither is provided
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
