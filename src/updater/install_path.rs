//! Locating the installation root.
//!
//! The running binary can sit anywhere below the checkout (`target/release`,
//! `target/debug/deps` for tests, a relocated bundle), so the root is found
//! by walking up from the executable to the `Cargo.toml` that names this
//! package. When no such manifest exists the root is assumed to be a fixed
//! number of levels above the executable.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::{INSTALL_MANIFEST_FILE, INSTALL_PATH_ENV, INSTALL_ROOT_FALLBACK_DEPTH};

/// Resolve the installation root for the running executable.
///
/// `GIT_AUTOUPDATE_INSTALL_PATH` overrides discovery.
pub fn resolve_install_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(INSTALL_PATH_ENV).filter(|p| !p.is_empty()) {
        tracing::debug!(target: "updater", "Install path from {INSTALL_PATH_ENV}");
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    Ok(find_install_root(&exe))
}

/// Walk up from `exe` to the directory whose manifest names this package.
#[must_use]
pub fn find_install_root(exe: &Path) -> PathBuf {
    let start = exe.parent().unwrap_or(exe);
    if let Some(root) = start.ancestors().find(|dir| is_install_root(dir)) {
        tracing::debug!(target: "updater", "Install root found at {}", root.display());
        return root.to_path_buf();
    }

    let fallback = exe.ancestors().nth(INSTALL_ROOT_FALLBACK_DEPTH).unwrap_or(start);
    tracing::debug!(
        target: "updater",
        "No {INSTALL_MANIFEST_FILE} for {} above {}, using {}",
        env!("CARGO_PKG_NAME"),
        exe.display(),
        fallback.display()
    );
    fallback.to_path_buf()
}

fn is_install_root(dir: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(dir.join(INSTALL_MANIFEST_FILE)) else {
        return false;
    };
    let Ok(manifest) = toml::from_str::<toml::Table>(&content) else {
        return false;
    };

    manifest
        .get("package")
        .and_then(|package| package.get("name"))
        .and_then(toml::Value::as_str)
        == Some(env!("CARGO_PKG_NAME"))
}
