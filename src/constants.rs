//! Global constants used throughout the git-autoupdate codebase.
//!
//! This module contains timeout durations, reserved names, and default
//! settings values used across multiple modules. Defining them centrally
//! keeps magic values discoverable.

use std::time::Duration;

/// The only branch the updater ever fetches from or merges.
pub const UPDATE_BRANCH: &str = "main";

/// Prefix of the throwaway remote added for each upstream operation.
///
/// The full name is `autoupdate-<uuid>` so concurrent invocations against the
/// same installation never share a remote.
pub const TEMP_REMOTE_PREFIX: &str = "autoupdate";

/// Upstream repository used when the settings file does not name one.
pub const DEFAULT_UPSTREAM_URL: &str = "https://github.com/git-autoupdate/git-autoupdate.git";

/// Default polling interval advertised to the UI layer (minutes).
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u32 = 15;

/// Lower bound for the polling interval (minutes).
pub const MIN_CHECK_INTERVAL_MINUTES: u32 = 1;

/// Upper bound for the polling interval (minutes).
pub const MAX_CHECK_INTERVAL_MINUTES: u32 = 60;

/// Timeout for local, read-only git queries (30 seconds).
pub const GIT_LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for git commands that touch the network or mutate the tree (120 seconds).
///
/// Covers `fetch` and `merge --ff-only`; both may wait on a slow upstream.
pub const GIT_NETWORK_TIMEOUT: Duration = Duration::from_secs(120);

/// Manifest file that marks the root of an installation.
pub const INSTALL_MANIFEST_FILE: &str = "Cargo.toml";

/// How many directories above the executable the fallback install root sits.
///
/// Matches the `target/<profile>/<binary>` layout of a source checkout.
pub const INSTALL_ROOT_FALLBACK_DEPTH: usize = 3;

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "GIT_AUTOUPDATE_CONFIG_PATH";

/// Environment variable overriding install-path discovery.
pub const INSTALL_PATH_ENV: &str = "GIT_AUTOUPDATE_INSTALL_PATH";

/// Git output marker for a merge that changed nothing.
pub const ALREADY_UP_TO_DATE_MARKER: &str = "already up to date";
