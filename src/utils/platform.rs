//! Platform-specific utilities and cross-platform compatibility helpers
//!
//! The updater frequently runs inside a host process that was launched from
//! a restricted environment (a GUI app bundle, a launchd/systemd unit, a
//! desktop shortcut). Such processes inherit a minimal `PATH` that often
//! misses the directories where git actually lives. This module computes an
//! extended search path once per process and exposes helpers built on it.
//!
//! # Platform Support Matrix
//!
//! | Feature | Windows | macOS | Linux |
//! |---------|---------|-------|-------|
//! | Git command | git.exe | git | git |
//! | Extra search dirs | Program Files Git | Homebrew, /usr/local | Linuxbrew, ~/.local |
//! | Path separator | `;` | `:` | `:` |

use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the appropriate Git command name for the current platform.
///
/// - `"git.exe"` on Windows
/// - `"git"` on Unix-like systems (macOS, Linux, BSD)
///
/// The name is resolved against [`augmented_path`], which is installed as
/// the child process `PATH` by the command builder.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Gets the home directory path for the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Well-known directories where git is installed outside the default `PATH`.
///
/// Entries that cannot be computed (missing env vars, no home dir) are skipped.
#[must_use]
pub fn extra_git_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if is_windows() {
        for var in ["ProgramFiles", "ProgramFiles(x86)", "ProgramW6432"] {
            if let Some(base) = std::env::var_os(var).filter(|v| !v.is_empty()) {
                let base = PathBuf::from(base);
                dirs.push(base.join("Git").join("cmd"));
                dirs.push(base.join("Git").join("bin"));
            }
        }
        if let Some(local) = dirs::data_local_dir() {
            dirs.push(local.join("Programs").join("Git").join("cmd"));
        }
    } else {
        dirs.push(PathBuf::from("/opt/homebrew/bin"));
        dirs.push(PathBuf::from("/usr/local/bin"));
        dirs.push(PathBuf::from("/home/linuxbrew/.linuxbrew/bin"));
        dirs.push(PathBuf::from("/usr/bin"));
        dirs.push(PathBuf::from("/bin"));
        if let Some(home) = dirs::home_dir() {
            dirs.push(home.join(".linuxbrew").join("bin"));
            dirs.push(home.join(".local").join("bin"));
        }
    }

    dirs
}

/// Build a search path with `extra` ahead of `inherited`.
///
/// Empty entries are dropped and each directory appears only once, keeping
/// its first position.
pub fn build_search_path(
    extra: &[PathBuf],
    inherited: Option<&std::ffi::OsStr>,
) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = Vec::new();

    let inherited_entries = inherited.map(|p| std::env::split_paths(p).collect::<Vec<_>>());
    for entry in extra.iter().cloned().chain(inherited_entries.into_iter().flatten()) {
        if entry.as_os_str().is_empty() || entries.contains(&entry) {
            continue;
        }
        entries.push(entry);
    }

    std::env::join_paths(entries)
        .map_err(|e| anyhow::anyhow!("Failed to build search path: {e}"))
}

/// The `PATH` value handed to every git child process.
///
/// Computed once per process lifetime from [`extra_git_search_dirs`] and the
/// inherited `PATH`. Falls back to the inherited value unchanged if joining
/// fails (a directory containing the separator character).
pub fn augmented_path() -> &'static OsString {
    static AUGMENTED: OnceLock<OsString> = OnceLock::new();
    AUGMENTED.get_or_init(|| {
        let inherited = std::env::var_os("PATH");
        match build_search_path(&extra_git_search_dirs(), inherited.as_deref()) {
            Ok(path) => {
                tracing::trace!(target: "git", "Augmented PATH: {}", path.to_string_lossy());
                path
            }
            Err(e) => {
                tracing::warn!(target: "git", "Using inherited PATH: {e}");
                inherited.unwrap_or_default()
            }
        }
    })
}

/// Checks if a command is available on the augmented search path.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(cmd, Some(augmented_path()), cwd).is_ok()
}
