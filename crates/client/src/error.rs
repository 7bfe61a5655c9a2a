// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the session manager and item store.
//!
//! Backend failures never escape as [`RemoteError`] directly; each
//! component converts them into its own error with a readable message.

use thiserror::Error;
use tk_core::ItemId;

use crate::backend::RemoteError;

/// Error returned by session manager operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed local checks; no remote call was made.
    #[error("{0}")]
    Validation(#[from] tk_core::Error),

    /// The backend refused the credentials or the account request.
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached or failed.
    #[error("auth service error: {0}")]
    Remote(String),
}

impl From<RemoteError> for AuthError {
    fn from(err: RemoteError) -> Self {
        if err.is_client_error() {
            AuthError::Rejected(err.message())
        } else {
            AuthError::Remote(err.message())
        }
    }
}

/// Error returned by item store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not signed in\n  hint: run 'tk login <email>' first")]
    Unauthenticated,

    #[error("{0}")]
    Remote(String),

    #[error("task not found: {0}")]
    NotFound(ItemId),
}

impl From<RemoteError> for StoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NoSession => StoreError::Unauthenticated,
            other => StoreError::Remote(other.message()),
        }
    }
}

/// Error from a fetch operation.
pub type FetchError = StoreError;

/// Error from a create, update or delete operation.
pub type MutationError = StoreError;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
