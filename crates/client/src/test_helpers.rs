// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: an in-memory backend with call counters.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use tk_core::{AuthEvent, Item, ItemFields, ItemId, NewItem, Priority, Session, User, UserId};
use tokio::sync::broadcast;

use crate::backend::{
    AuthBackend, BoxFuture, RemoteError, RemoteResult, TaskBackend, TaskQuery,
};

/// Build an item with fixed text fields.
pub fn item(id: i64, owner: &str, priority: Priority) -> Item {
    Item {
        id: ItemId(id),
        title: format!("Task {}", id),
        category: "General".into(),
        priority,
        owner: UserId::new(owner),
        created_at: Utc::now(),
    }
}

#[derive(Default)]
struct MockState {
    /// email -> (password, user)
    accounts: HashMap<String, (String, User)>,
    /// Session the backend considers persisted.
    session: Option<User>,
    rows: Vec<Item>,
    next_id: i64,
    failure: Option<RemoteError>,
    /// Ignore the owner filter on select, as a misconfigured backend would.
    leak_foreign_rows: bool,
    /// Artificial latency for update calls, keyed by title.
    update_delays: HashMap<String, Duration>,
    select_delay: Option<Duration>,
    /// Stamp inserted rows with this owner instead of the requested one.
    insert_owner: Option<UserId>,
}

/// In-memory backend implementing both auth and task endpoints.
pub struct MockBackend {
    state: Mutex<MockState>,
    events: broadcast::Sender<AuthEvent>,
    auth_calls: AtomicUsize,
    task_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        MockBackend {
            state: Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
            events,
            auth_calls: AtomicUsize::new(0),
            task_calls: AtomicUsize::new(0),
        }
    }

    /// Register an account without going through sign-up.
    pub fn with_account(&self, email: &str, password: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: UserId::new(format!("user-{}", state.accounts.len() + 1)),
            email: email.to_string(),
        };
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Mark `user` as having persisted credentials.
    pub fn persist_session(&self, user: Option<User>) {
        self.state.lock().unwrap().session = user;
    }

    /// Insert a row directly, bypassing the store.
    pub fn seed(&self, owner: &UserId, title: &str, priority: Priority) -> Item {
        let mut state = self.state.lock().unwrap();
        let row = Item {
            id: ItemId(state.next_id),
            title: title.to_string(),
            category: "General".into(),
            priority,
            owner: owner.clone(),
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.rows.push(row.clone());
        row
    }

    pub fn rows(&self) -> Vec<Item> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Make every following call fail with `err` (or succeed again with `None`).
    pub fn set_failure(&self, err: Option<RemoteError>) {
        self.state.lock().unwrap().failure = err;
    }

    pub fn set_leak_foreign_rows(&self, leak: bool) {
        self.state.lock().unwrap().leak_foreign_rows = leak;
    }

    /// Delay updates that set the title to `title`.
    pub fn delay_update(&self, title: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .update_delays
            .insert(title.to_string(), delay);
    }

    /// Delay every select call.
    pub fn set_insert_owner(&self, owner: Option<UserId>) {
        self.state.lock().unwrap().insert_owner = owner;
    }

    pub fn delay_select(&self, delay: Duration) {
        self.state.lock().unwrap().select_delay = Some(delay);
    }

    /// Push an auth event as the backend would on its own.
    pub fn push(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn task_calls(&self) -> usize {
        self.task_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> RemoteResult<()> {
        match &self.state.lock().unwrap().failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn begin_auth(&self) -> RemoteResult<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }

    fn begin_task(&self) -> RemoteResult<()> {
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }

    fn open_session(&self, user: User) -> Session {
        self.state.lock().unwrap().session = Some(user.clone());
        self.push(AuthEvent::SignedIn(user.clone()));
        Session::Authenticated(user)
    }
}

impl AuthBackend for MockBackend {
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Session>> {
        Box::pin(async move {
            self.begin_auth()?;
            if self.state.lock().unwrap().accounts.contains_key(email) {
                return Err(RemoteError::Rejected {
                    status: 422,
                    message: "User already registered".into(),
                });
            }
            let user = self.with_account(email, password);
            Ok(self.open_session(user))
        })
    }

    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Session>> {
        Box::pin(async move {
            self.begin_auth()?;
            let account = self.state.lock().unwrap().accounts.get(email).cloned();
            match account {
                Some((stored, user)) if stored == password => Ok(self.open_session(user)),
                _ => Err(RemoteError::Rejected {
                    status: 400,
                    message: "Invalid login credentials".into(),
                }),
            }
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            self.begin_auth()?;
            self.state.lock().unwrap().session = None;
            self.push(AuthEvent::SignedOut);
            Ok(())
        })
    }

    fn current_session(&self) -> BoxFuture<'_, RemoteResult<Session>> {
        Box::pin(async move {
            self.begin_auth()?;
            Ok(match self.state.lock().unwrap().session.clone() {
                Some(user) => Session::Authenticated(user),
                None => Session::Unauthenticated,
            })
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl TaskBackend for MockBackend {
    fn select(&self, query: TaskQuery) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            self.begin_task()?;
            let delay = self.state.lock().unwrap().select_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let state = self.state.lock().unwrap();
            let mut rows: Vec<Item> = state
                .rows
                .iter()
                .filter(|row| {
                    (state.leak_foreign_rows || row.is_owned_by(&query.owner))
                        && query.priority.is_none_or(|p| row.priority == p)
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        })
    }

    fn insert(&self, item: NewItem) -> BoxFuture<'_, RemoteResult<Item>> {
        Box::pin(async move {
            self.begin_task()?;
            let mut state = self.state.lock().unwrap();
            let row = Item {
                id: ItemId(state.next_id),
                title: item.title,
                category: item.category,
                priority: item.priority,
                owner: state.insert_owner.clone().unwrap_or(item.owner),
                created_at: Utc::now(),
            };
            state.next_id += 1;
            state.rows.push(row.clone());
            Ok(row)
        })
    }

    fn update(
        &self,
        id: ItemId,
        owner: UserId,
        fields: ItemFields,
    ) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            self.begin_task()?;
            let delay = self
                .state
                .lock()
                .unwrap()
                .update_delays
                .get(&fields.title)
                .copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mut state = self.state.lock().unwrap();
            let mut updated = Vec::new();
            for row in state
                .rows
                .iter_mut()
                .filter(|row| row.id == id && row.is_owned_by(&owner))
            {
                row.title = fields.title.clone();
                row.category = fields.category.clone();
                row.priority = fields.priority;
                updated.push(row.clone());
            }
            Ok(updated)
        })
    }

    fn delete(&self, id: ItemId, owner: UserId) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            self.begin_task()?;
            let mut state = self.state.lock().unwrap();
            let (deleted, kept): (Vec<Item>, Vec<Item>) = state
                .rows
                .drain(..)
                .partition(|row| row.id == id && row.is_owned_by(&owner));
            state.rows = kept;
            Ok(deleted)
        })
    }
}
