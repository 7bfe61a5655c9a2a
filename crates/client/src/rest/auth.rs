// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Auth endpoints: sign-up, password grant, logout and session restore.

use chrono::Utc;
use reqwest::StatusCode;
use serde::Serialize;
use tk_core::{AuthEvent, Session, User};
use tokio::sync::broadcast;

use super::token::TokenResponse;
use super::{read_json, RestBackend};
use crate::backend::{AuthBackend, BoxFuture, RemoteError, RemoteResult};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl RestBackend {
    /// Open a session from a token response and announce it.
    async fn open_session(&self, response: TokenResponse) -> Session {
        let mut tokens = self.tokens.lock().await;
        let stored = self.adopt(&mut tokens, response);
        self.emit(AuthEvent::SignedIn(stored.user.clone()));
        stored.session()
    }

    /// Fetch the user behind the current access token.
    async fn fetch_user(&self, access_token: &str) -> RemoteResult<User> {
        let request = self
            .http
            .get(self.auth_url("user"))
            .bearer_auth(access_token);
        read_json(self.send(request).await?).await
    }
}

impl AuthBackend for RestBackend {
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Session>> {
        Box::pin(async move {
            let request = self
                .http
                .post(self.auth_url("signup"))
                .json(&Credentials { email, password });
            let body: serde_json::Value = read_json(self.send(request).await?).await?;

            // With email confirmation enabled the service returns only the user.
            if body.get("access_token").is_none() {
                return Err(RemoteError::PendingConfirmation);
            }
            let response: TokenResponse = serde_json::from_value(body)
                .map_err(|e| RemoteError::Decode(e.to_string()))?;
            Ok(self.open_session(response).await)
        })
    }

    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Session>> {
        Box::pin(async move {
            let request = self
                .http
                .post(self.auth_url("token"))
                .query(&[("grant_type", "password")])
                .json(&Credentials { email, password });
            let response: TokenResponse = read_json(self.send(request).await?).await?;
            Ok(self.open_session(response).await)
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            let mut tokens = self.tokens.lock().await;
            if tokens.is_none() {
                *tokens = self.session_file.load();
            }
            let Some(stored) = tokens.clone() else {
                return Ok(());
            };

            let request = self
                .http
                .post(self.auth_url("logout"))
                .bearer_auth(&stored.access_token);
            let result = match self.send(request).await {
                Ok(_) => Ok(()),
                // The token is already dead remotely; that is what we wanted.
                Err(RemoteError::Rejected { status, .. })
                    if status == StatusCode::UNAUTHORIZED.as_u16() =>
                {
                    Ok(())
                }
                Err(e) => Err(e),
            };

            self.discard(&mut tokens);
            self.emit(AuthEvent::SignedOut);
            result
        })
    }

    fn current_session(&self) -> BoxFuture<'_, RemoteResult<Session>> {
        Box::pin(async move {
            let mut tokens = self.tokens.lock().await;
            if tokens.is_none() {
                *tokens = self.session_file.load();
            }
            let Some(mut stored) = tokens.clone() else {
                return Ok(Session::Unauthenticated);
            };

            if stored.needs_refresh(Utc::now(), self.config.refresh_margin()) {
                stored = match self.refresh(&mut tokens).await {
                    Ok(stored) => stored,
                    Err(RemoteError::NoSession) => return Ok(Session::Unauthenticated),
                    Err(e) => return Err(e),
                };
            }

            match self.fetch_user(&stored.access_token).await {
                Ok(user) => {
                    if user != stored.user {
                        stored.user = user.clone();
                        if let Err(e) = self.session_file.save(&stored) {
                            tracing::warn!("failed to persist updated user: {}", e);
                        }
                        *tokens = Some(stored.clone());
                        self.emit(AuthEvent::UserUpdated(user));
                    }
                    Ok(stored.session())
                }
                Err(e) if e.is_client_error() => {
                    tracing::info!("persisted session rejected: {}", e.message());
                    self.discard(&mut tokens);
                    self.emit(AuthEvent::Expired);
                    Ok(Session::Unauthenticated)
                }
                Err(e) => Err(e),
            }
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
