// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Seam between the client core and the remote backend.
//!
//! The backend provides authentication and a generic collection API. Both
//! are expressed as traits so the session manager and item store can run
//! against the HTTP backend in production and an in-memory mock in tests.

use std::future::Future;
use std::pin::Pin;

use tk_core::{AuthEvent, Item, ItemFields, ItemId, NewItem, Priority, Session, UserId};
use tokio::sync::broadcast;

/// Boxed future returned by backend calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error reported by the backend or the transport in front of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// An authenticated call was made with no stored credentials.
    #[error("no active session")]
    NoSession,

    /// The account exists but its email address is not confirmed yet.
    #[error("check your email to confirm the account, then sign in")]
    PendingConfirmation,
}

impl RemoteError {
    /// Human-readable text suitable for showing to a user.
    pub fn message(&self) -> String {
        match self {
            RemoteError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True if the backend refused the request itself (bad input or credentials).
    pub fn is_client_error(&self) -> bool {
        match self {
            RemoteError::Rejected { status, .. } => (400..500).contains(status),
            RemoteError::PendingConfirmation => true,
            _ => false,
        }
    }
}

/// Result type for backend calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Authentication endpoints of the backend.
pub trait AuthBackend: Send + Sync {
    /// Create an account and open a session for it.
    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str)
        -> BoxFuture<'a, RemoteResult<Session>>;

    /// Check credentials and open a session.
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str)
        -> BoxFuture<'a, RemoteResult<Session>>;

    /// Invalidate the current session remotely.
    fn sign_out(&self) -> BoxFuture<'_, RemoteResult<()>>;

    /// Session restored from persisted credentials, if still valid.
    fn current_session(&self) -> BoxFuture<'_, RemoteResult<Session>>;

    /// Stream of session changes pushed by the backend.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Owner-scoped read of the tasks collection, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub owner: UserId,
    pub priority: Option<Priority>,
}

impl TaskQuery {
    pub fn owned_by(owner: UserId) -> Self {
        TaskQuery {
            owner,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns true if `item` satisfies this query's filters.
    pub fn matches(&self, item: &Item) -> bool {
        item.is_owned_by(&self.owner) && self.priority.is_none_or(|p| item.priority == p)
    }
}

/// Collection endpoints of the backend, bound to the tasks collection.
pub trait TaskBackend: Send + Sync {
    /// Select rows matching `query`, ordered by id descending.
    fn select(&self, query: TaskQuery) -> BoxFuture<'_, RemoteResult<Vec<Item>>>;

    /// Insert a row and return it as stored.
    fn insert(&self, item: NewItem) -> BoxFuture<'_, RemoteResult<Item>>;

    /// Update rows matching both `id` and `owner`; returns the updated rows.
    fn update(
        &self,
        id: ItemId,
        owner: UserId,
        fields: ItemFields,
    ) -> BoxFuture<'_, RemoteResult<Vec<Item>>>;

    /// Delete rows matching both `id` and `owner`; returns the deleted rows.
    fn delete(&self, id: ItemId, owner: UserId) -> BoxFuture<'_, RemoteResult<Vec<Item>>>;
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
