//! Response records produced by the update operations.
//!
//! All records serialize with camelCase keys, the shape UI and HTTP layers
//! consume. They are rebuilt from the live repository on every call and
//! never cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Snapshot of the installation and its update settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationInfo {
    /// Root of the installation
    pub install_path: PathBuf,
    /// Full revision of the checked-out commit; absent without git or a repository
    pub current_version: Option<String>,
    /// Abbreviated revision
    pub current_version_short: Option<String>,
    /// Checked-out branch; absent when detached or unavailable
    pub current_branch: Option<String>,
    /// Whether the working tree has modifications
    pub has_local_changes: bool,
    /// Configured update source
    pub source_url: String,
    /// Whether periodic checks are enabled
    pub auto_update_enabled: bool,
    /// Minutes between periodic checks, in `1..=60`
    pub check_interval_minutes: u32,
    /// Mechanism-specific extras
    pub mechanism_info: BTreeMap<String, serde_json::Value>,
}

/// Outcome of comparing the installation with upstream.
///
/// `error` is set when upstream could not be queried; the result is still
/// a success and the remote fields are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// True only when the local revision is a strict ancestor of upstream
    pub update_available: bool,
    pub local_version: String,
    pub local_version_short: String,
    pub remote_version: Option<String>,
    pub remote_version_short: Option<String>,
    pub source_url: String,
    pub install_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a fast-forward pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResult {
    pub success: bool,
    pub previous_version: String,
    pub previous_version_short: String,
    pub new_version: String,
    pub new_version_short: String,
    /// Equal to `previous_version == new_version`
    pub already_up_to_date: bool,
    /// Human-readable summary
    pub message: String,
}

/// Notification published after a successful pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpdateEvent {
    #[serde(rename_all = "camelCase")]
    Pulled {
        new_version: String,
        already_up_to_date: bool,
    },
}
