//! Core types for git-autoupdate
//!
//! This module holds the error taxonomy shared by every layer of the updater:
//! - [`UpdateError`] - Enumerated failure cases, each with a stable kind name
//!   and an HTTP-equivalent status code
//! - [`ErrorContext`] - User-friendly wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error into an [`ErrorContext`]

pub mod error;

pub use error::{ErrorContext, UpdateError, user_friendly_error};
