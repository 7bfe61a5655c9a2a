// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication state and the events that move it.
//!
//! A process holds exactly one [`Session`] at a time. It starts from
//! whatever credentials were persisted, then moves between
//! `Unauthenticated` and `Authenticated` on local calls (sign-in, sign-up,
//! sign-out) and on [`AuthEvent`]s pushed by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an authenticated user, as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
}

/// Current authentication state of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(|u| &u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Unauthenticated => write!(f, "not signed in"),
            Session::Authenticated(user) => write!(f, "{} ({})", user.email, user.id),
        }
    }
}

/// Session change pushed by the backend, possibly without any local call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
    TokenRefreshed(User),
    UserUpdated(User),
    /// The session could not be kept alive (refresh rejected or token revoked).
    Expired,
}

impl AuthEvent {
    /// The session this event leaves the process in.
    pub fn session(&self) -> Session {
        match self {
            AuthEvent::SignedIn(user)
            | AuthEvent::TokenRefreshed(user)
            | AuthEvent::UserUpdated(user) => Session::Authenticated(user.clone()),
            AuthEvent::SignedOut | AuthEvent::Expired => Session::Unauthenticated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "signed_in",
            AuthEvent::SignedOut => "signed_out",
            AuthEvent::TokenRefreshed(_) => "token_refreshed",
            AuthEvent::UserUpdated(_) => "user_updated",
            AuthEvent::Expired => "expired",
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
