// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session manager: the single source of truth for who is signed in.
//!
//! The current [`Session`] lives in a [`SessionContext`] that is handed to
//! whoever needs it (the item store, tests) instead of living in a global.
//! It changes on local calls and on events pushed by the backend; both
//! paths go through the same update so listeners see each change once.
//!
//! ```text
//!                 sign_in / sign_up / SignedIn push
//!  Unauthenticated ───────────────────────────────► Authenticated
//!                 ◄───────────────────────────────
//!                 sign_out / SignedOut / Expired push
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use tk_core::{validate_credentials, Session, UserId};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::backend::AuthBackend;
use crate::error::AuthError;

/// Shared handle to the process's current session.
///
/// Clones observe the same session. Separate `new()` contexts are fully
/// independent.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that starts out signed in, for callers that already hold a session.
    pub fn with_session(session: Session) -> Self {
        SessionContext {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Identity of the signed-in user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id()
            .cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }

    /// Store `session`, returning true if it differs from the previous one.
    pub(crate) fn replace(&self, session: Session) -> bool {
        let mut current = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if *current == session {
            return false;
        }
        *current = session;
        true
    }
}

type Callback = Arc<dyn Fn(&Session) + Send + Sync>;

/// Registered session-change callbacks.
#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

impl Listeners {
    fn add(&self, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    fn remove(&self, id: u64) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(cb_id, _)| *cb_id != id);
    }

    fn len(&self) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, session: &Session) {
        // Callbacks run outside the lock so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(session);
        }
    }
}

/// State shared between the manager and its watch task.
struct Shared {
    context: SessionContext,
    listeners: Listeners,
}

impl Shared {
    fn apply(&self, session: Session) {
        if !self.context.replace(session.clone()) {
            return;
        }
        match session.user_id() {
            Some(id) => tracing::info!(user = %id, "session authenticated"),
            None => tracing::info!("session cleared"),
        }
        self.listeners.notify(&session);
    }
}

/// Handle returned by [`SessionManager::subscribe`].
///
/// The callback stays registered until this handle is dropped or
/// [`unsubscribe`](Subscription::unsubscribe) is called.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.listeners.remove(self.id);
        }
    }
}

/// Handle to the task applying backend-pushed session events.
///
/// Dropping it stops the task, so no callback fires after the owner is gone.
#[must_use = "dropping a WatchHandle stops watching immediately"]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn stop(self) {}
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Wraps the backend's auth endpoints and tracks the resulting session.
pub struct SessionManager<A: AuthBackend> {
    backend: Arc<A>,
    shared: Arc<Shared>,
}

impl<A: AuthBackend> SessionManager<A> {
    /// Create a manager with a fresh, unauthenticated context.
    pub fn new(backend: Arc<A>) -> Self {
        Self::with_context(backend, SessionContext::new())
    }

    /// Create a manager that updates an existing context.
    pub fn with_context(backend: Arc<A>, context: SessionContext) -> Self {
        SessionManager {
            backend,
            shared: Arc::new(Shared {
                context,
                listeners: Listeners::default(),
            }),
        }
    }

    /// The context this manager keeps up to date.
    pub fn context(&self) -> SessionContext {
        self.shared.context.clone()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.shared.context.current()
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.len()
    }

    /// Restore a persisted session. Any failure yields `Unauthenticated`.
    pub async fn check_existing_session(&self) -> Session {
        let session = match self.backend.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("could not restore session: {}", e);
                Session::Unauthenticated
            }
        };
        self.shared.apply(session.clone());
        session
    }

    /// Create an account and sign in to it.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_credentials(email, password)?;
        let session = self.backend.sign_up(email.trim(), password).await?;
        self.shared.apply(session.clone());
        Ok(session)
    }

    /// Sign in with existing credentials.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_credentials(email, password)?;
        let session = self.backend.sign_in(email.trim(), password).await?;
        self.shared.apply(session.clone());
        Ok(session)
    }

    /// Sign out remotely. The local session is cleared even if the remote call fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.backend.sign_out().await;
        self.shared.apply(Session::Unauthenticated);
        result.map_err(AuthError::from)
    }

    /// Register a callback for session changes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = self.shared.listeners.add(Arc::new(callback));
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl<A: AuthBackend + 'static> SessionManager<A> {
    /// Start applying session events pushed by the backend.
    ///
    /// Must be called from within a tokio runtime. Events are received from
    /// the moment this returns.
    pub fn watch(&self) -> WatchHandle {
        let mut events = self.backend.subscribe();
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::debug!(event = event.as_str(), "auth event");
                        shared.apply(event.session());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("missed {} auth events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        WatchHandle { task }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
