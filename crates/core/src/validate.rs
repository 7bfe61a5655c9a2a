// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-side validation, run before anything reaches the backend.

use crate::error::{Error, Result};

/// Shortest password the sign-up and sign-in forms accept.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate email and password before an auth call.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "Email" });
    }
    if password.is_empty() {
        return Err(Error::FieldEmpty { field: "Password" });
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validate the text fields of a task before create or update.
pub fn validate_item_fields(title: &str, category: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "Title" });
    }
    if category.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "Category" });
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
