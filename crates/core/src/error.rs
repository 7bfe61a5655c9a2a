// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tk-core operations.

use thiserror::Error;

/// Errors raised while parsing or validating task and session data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid priority: '{0}'\n  hint: valid priorities are: High, Medium, Low")]
    InvalidPriority(String),

    #[error("invalid task id: '{0}'\n  hint: task ids are integers, see 'tk list'")]
    InvalidItemId(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// A specialized Result type for tk-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
