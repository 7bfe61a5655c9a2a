// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Access/refresh token set and its on-disk persistence.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tk_core::{Session, User};

/// Lifetime assumed when the auth service omits both expiry fields.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Credentials for an open session, as persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl StoredSession {
    /// True if the access token expires within `margin` of `now`.
    ///
    /// A margin too large to represent always asks for a refresh.
    pub fn needs_refresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        let Ok(margin) = TimeDelta::from_std(margin) else {
            return true;
        };
        self.expires_at
            .checked_sub_signed(margin)
            .is_none_or(|deadline| deadline <= now)
    }

    pub fn session(&self) -> Session {
        Session::Authenticated(self.user.clone())
    }
}

/// Body returned by the token, sign-up and refresh endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl TokenResponse {
    /// An expiry that cannot be represented is treated as already reached.
    pub fn into_stored(self, now: DateTime<Utc>) -> StoredSession {
        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| {
                TimeDelta::try_seconds(expires_in).and_then(|ttl| now.checked_add_signed(ttl))
            })
            .unwrap_or(now);
        StoredSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// JSON file holding the persisted [`StoredSession`].
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        SessionFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. A missing or unreadable file means none.
    pub fn load(&self) -> Option<StoredSession> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!("ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Write the session, readable only by the current user on unix.
    pub fn save(&self, stored: &StoredSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(stored)?;

        let mut options = fs::OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(&json)?;
        Ok(())
    }

    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
