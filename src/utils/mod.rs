//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Atomic file writes used by settings persistence
//! - [`platform`] - Git command name and the augmented child-process `PATH`

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{augmented_path, command_exists, get_git_command, get_home_dir, is_windows};
