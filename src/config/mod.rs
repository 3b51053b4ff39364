//! Configuration management for git-autoupdate
//!
//! The updater reads a single user-level settings file. See [`settings`]
//! for its location, format and defaults.
//!
//! # Precedence
//!
//! 1. `--config <PATH>` on the command line
//! 2. `GIT_AUTOUPDATE_CONFIG_PATH`
//! 3. The platform default location
//!
//! Settings are loaded once per command and passed to the coordinator as a
//! snapshot.

pub mod settings;

pub use settings::{AutoUpdateConfig, MechanismKind};
