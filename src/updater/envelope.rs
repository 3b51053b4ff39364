//! Success/failure envelope returned to callers.
//!
//! Every operation's entry point ends in [`ApiResponse::from_result`], so no
//! raw process or runtime error ever reaches a caller: anything without a
//! typed [`UpdateError`] in its chain becomes an `InternalError` envelope.

use serde::{Deserialize, Serialize};

use crate::core::UpdateError;

/// `{ success, result?, error?, errorKind?, status? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// HTTP-equivalent status code, present on failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// A success envelope.
    pub const fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            error_kind: None,
            status: None,
        }
    }

    /// A failure envelope for `error`.
    #[must_use]
    pub fn failure(error: &UpdateError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
            status: Some(error.status_code()),
        }
    }

    /// Convert an operation result, classifying any error.
    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => {
                let error = surface(UpdateError::classify(&e));
                if matches!(error, UpdateError::Internal { .. }) {
                    tracing::error!(target: "updater", "Unexpected failure: {e:#}");
                } else {
                    tracing::debug!(target: "updater", "Operation failed: {e:#}");
                }
                Self::failure(&error)
            }
        }
    }

    /// The status code, 200 for success envelopes.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(200)
    }
}

/// A bare process failure that no operation classified becomes `Internal`,
/// keeping git's own output in the message.
fn surface(error: UpdateError) -> UpdateError {
    let UpdateError::GitCommandError { stderr, .. } = &error else {
        return error;
    };
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        error.to_string()
    } else {
        format!("{error}: {stderr}")
    };
    UpdateError::Internal {
        message,
    }
}
