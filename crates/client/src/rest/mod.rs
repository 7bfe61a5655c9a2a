// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP backend speaking the GoTrue auth API and the PostgREST collection API.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ SessionManager │────►│             │────►│ /auth/v1/*   │
//! └────────────────┘     │ RestBackend │     └──────────────┘
//! ┌────────────────┐     │  (tokens)   │     ┌──────────────┐
//! │   ItemStore    │────►│             │────►│ /rest/v1/... │
//! └────────────────┘     └─────────────┘     └──────────────┘
//!                               │
//!                               ▼
//!                        ┌─────────────┐
//!                        │ SessionFile │  (persisted credentials)
//!                        └─────────────┘
//! ```
//!
//! The backend owns the token set. Before each authenticated request it
//! refreshes a token that is about to expire and pushes the outcome as an
//! [`AuthEvent`], which is how expiry reaches the session manager without
//! any explicit local call.

mod auth;
mod tasks;
#[cfg(test)]
mod test_server;
mod token;

pub use token::{SessionFile, StoredSession};

use chrono::Utc;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tk_core::AuthEvent;
use tokio::sync::{broadcast, Mutex};

use crate::backend::{RemoteError, RemoteResult};
use crate::config::ClientConfig;
use token::TokenResponse;

/// Capacity of the auth event channel.
const EVENT_CAPACITY: usize = 16;

/// Backend client for a hosted auth + collection service.
pub struct RestBackend {
    http: reqwest::Client,
    config: ClientConfig,
    /// Current credentials. Held across refresh so only one refresh runs at a time.
    tokens: Mutex<Option<StoredSession>>,
    session_file: SessionFile,
    events: broadcast::Sender<AuthEvent>,
}

impl RestBackend {
    /// Create a backend for `config`. No request is made until first use.
    pub fn new(config: ClientConfig) -> RemoteResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let session_file = SessionFile::new(config.session_path());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(RestBackend {
            http,
            config,
            tokens: Mutex::new(None),
            session_file,
            events,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.base_url(), path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url(), self.config.table)
    }

    fn emit(&self, event: AuthEvent) {
        tracing::debug!(event = event.as_str(), "pushing auth event");
        // No receivers is fine: nobody is watching yet.
        let _ = self.events.send(event);
    }

    /// Send `request` with the API key and turn non-success statuses into errors.
    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request
            .header("apikey", &self.config.anon_key)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request rejected: {}", body);
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    /// Persist and adopt a fresh token set.
    fn adopt(&self, tokens: &mut Option<StoredSession>, response: TokenResponse) -> StoredSession {
        let stored = response.into_stored(Utc::now());
        if let Err(e) = self.session_file.save(&stored) {
            tracing::warn!(
                "failed to persist session to {}: {}",
                self.session_file.path().display(),
                e
            );
        }
        *tokens = Some(stored.clone());
        stored
    }

    /// Forget the token set locally and on disk.
    fn discard(&self, tokens: &mut Option<StoredSession>) {
        *tokens = None;
        if let Err(e) = self.session_file.remove() {
            tracing::warn!(
                "failed to remove {}: {}",
                self.session_file.path().display(),
                e
            );
        }
    }

    /// Exchange the refresh token for a new token set.
    ///
    /// If the auth service refuses, the session is over: credentials are
    /// discarded and `Expired` is pushed. Network failures keep the tokens.
    async fn refresh(&self, tokens: &mut Option<StoredSession>) -> RemoteResult<StoredSession> {
        let refresh_token = match tokens.as_ref() {
            Some(stored) => stored.refresh_token.clone(),
            None => return Err(RemoteError::NoSession),
        };
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));

        let result = match self.send(request).await {
            Ok(response) => read_json::<TokenResponse>(response).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(response) => {
                let stored = self.adopt(tokens, response);
                self.emit(AuthEvent::TokenRefreshed(stored.user.clone()));
                Ok(stored)
            }
            Err(e) if e.is_client_error() => {
                tracing::info!("session expired: {}", e.message());
                self.discard(tokens);
                self.emit(AuthEvent::Expired);
                Err(RemoteError::NoSession)
            }
            Err(e) => Err(e),
        }
    }

    /// A usable access token, refreshed first if it is about to expire.
    async fn access_token(&self) -> RemoteResult<String> {
        let mut tokens = self.tokens.lock().await;
        if tokens.is_none() {
            *tokens = self.session_file.load();
        }
        let stored = match tokens.as_ref() {
            Some(stored) => stored.clone(),
            None => return Err(RemoteError::NoSession),
        };
        if stored.needs_refresh(Utc::now(), self.config.refresh_margin()) {
            let refreshed = self.refresh(&mut tokens).await?;
            return Ok(refreshed.access_token);
        }
        Ok(stored.access_token)
    }
}

/// Decode a JSON response body.
async fn read_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Pull a readable message out of an error body.
///
/// Auth errors use `msg` or `error_description`, collection errors use
/// `message`; anything else falls back to the raw body or status text.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
