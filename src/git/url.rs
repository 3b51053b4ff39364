//! Upstream URL validation and display sanitizing.
//!
//! The configured upstream URL ends up on a git command line, so it is the
//! one piece of user-controlled input that reaches an external process.
//! [`is_valid_update_url`] is the gate every coordinator operation passes
//! before any git command runs.

use crate::core::UpdateError;

/// URL prefixes accepted for an update source.
pub const ACCEPTED_URL_PREFIXES: &[&str] = &["https://", "git@", "ssh://", "git://"];

/// Characters that could be used for shell command injection.
pub const FORBIDDEN_URL_CHARS: &[char] =
    &[';', '`', '|', '&', '<', '>', '(', ')', '$', '!', '\\', '[', ']', ' '];

/// Checks whether `url` is acceptable as an update source.
///
/// A URL is accepted only if it starts with one of [`ACCEPTED_URL_PREFIXES`],
/// has something after the prefix, and contains none of
/// [`FORBIDDEN_URL_CHARS`]. Control characters (newlines, tabs) are rejected
/// as well.
///
/// # Examples
///
/// ```rust
/// use git_autoupdate::git::is_valid_update_url;
///
/// assert!(is_valid_update_url("https://github.com/owner/repo.git"));
/// assert!(is_valid_update_url("git@github.com:owner/repo.git"));
/// assert!(!is_valid_update_url("https://evil.com/x; rm -rf /"));
/// assert!(!is_valid_update_url("file:///tmp/repo"));
/// ```
#[must_use]
pub fn is_valid_update_url(url: &str) -> bool {
    let Some(rest) = ACCEPTED_URL_PREFIXES.iter().find_map(|prefix| url.strip_prefix(prefix))
    else {
        return false;
    };

    !rest.is_empty()
        && !url.contains(FORBIDDEN_URL_CHARS)
        && !url.chars().any(char::is_control)
}

/// Validates `url`, returning [`UpdateError::InvalidUrl`] when it is rejected.
pub fn ensure_valid_update_url(url: &str) -> Result<(), UpdateError> {
    if is_valid_update_url(url) {
        Ok(())
    } else {
        Err(UpdateError::InvalidUrl {
            url: strip_auth_from_url(url),
        })
    }
}

/// Strips authentication information from a Git URL for safe display or logging.
///
/// Only `http(s)://user:token@host/...` credentials are removed; SSH-style
/// `git@host:path` URLs carry a username, not a secret, and are returned
/// unchanged.
///
/// This is for **display/logging only**; git still receives the original URL.
#[must_use]
pub fn strip_auth_from_url(url: &str) -> String {
    for protocol in ["https://", "http://"] {
        let Some(rest) = url.strip_prefix(protocol) else {
            continue;
        };
        let host_end = rest.find('/').unwrap_or(rest.len());
        if let Some(at_pos) = rest[..host_end].rfind('@') {
            return format!("{protocol}{}", &rest[at_pos + 1..]);
        }
    }

    url.to_string()
}
