// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Item store: the local task list, kept in step with the remote collection.
//!
//! Every read and write is scoped to the signed-in user taken from the
//! injected [`SessionContext`]. The local list only changes after a remote
//! call succeeds, so a failed call never leaves it half-updated.
//!
//! Operations take `&self` and may be issued concurrently. The state lock
//! is never held across a remote call; each operation applies its result
//! when its own call resolves, so completion order decides the final list.
//! A result that arrives after the session has moved on to another user (or
//! signed out) is dropped instead of applied.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tk_core::{Item, ItemFields, ItemId, Priority, UserId};

use crate::backend::{TaskBackend, TaskQuery};
use crate::error::{FetchError, MutationError, StoreError};
use crate::session::SessionContext;

#[derive(Debug, Default)]
struct StoreState {
    items: Vec<Item>,
    /// Fetches currently awaiting the backend.
    in_flight: usize,
    error: Option<String>,
}

/// Keeps the loading flag raised while alive.
///
/// Dropping it lowers the flag on every exit path, including a cancelled future.
struct LoadingGuard<'a> {
    state: &'a Mutex<StoreState>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a Mutex<StoreState>) -> Self {
        state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight += 1;
        LoadingGuard { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Owner-scoped mirror of the remote tasks collection.
pub struct ItemStore<B: TaskBackend> {
    backend: Arc<B>,
    session: SessionContext,
    state: Mutex<StoreState>,
}

impl<B: TaskBackend> ItemStore<B> {
    pub fn new(backend: Arc<B>, session: SessionContext) -> Self {
        ItemStore {
            backend,
            session,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the local list, newest first.
    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// Look up an item in the local list.
    pub fn find(&self, id: ItemId) -> Option<Item> {
        self.lock().items.iter().find(|item| item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// True while a fetch is awaiting the backend.
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Message from the most recent failed operation, if not since cleared.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Initial load after sign-in. Without a session it clears local state
    /// and makes no remote call.
    pub async fn bootstrap(&self) -> Result<Vec<Item>, FetchError> {
        if !self.session.is_authenticated() {
            self.clear();
            return Ok(Vec::new());
        }
        self.fetch(None).await
    }

    /// Replace the list with all of the user's tasks.
    pub async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(None).await
    }

    /// Replace the list with only the user's high-priority tasks.
    pub async fn fetch_high_priority(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(Some(Priority::High)).await
    }

    /// Replace the list with the user's tasks of one priority.
    pub async fn fetch_by_priority(&self, priority: Priority) -> Result<Vec<Item>, FetchError> {
        self.fetch(Some(priority)).await
    }

    async fn fetch(&self, priority: Option<Priority>) -> Result<Vec<Item>, FetchError> {
        let owner = self.require_user()?;
        let _loading = LoadingGuard::start(&self.state);

        let mut query = TaskQuery::owned_by(owner);
        if let Some(priority) = priority {
            query = query.with_priority(priority);
        }

        let mut rows = match self.backend.select(query.clone()).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail("fetch", e.into())),
        };

        let before = rows.len();
        rows.retain(|item| item.is_owned_by(&query.owner));
        if rows.len() != before {
            tracing::warn!(
                "discarded {} task(s) owned by another user",
                before - rows.len()
            );
        }
        tracing::debug!(count = rows.len(), ?priority, "fetched tasks");

        let mut state = self.lock_for(&query.owner, "fetch")?;
        state.items = rows.clone();
        state.error = None;
        Ok(rows)
    }

    /// Create a task owned by the current user and put it at the top of the list.
    ///
    /// Title and category are expected to be validated by the caller.
    pub async fn create(
        &self,
        title: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
    ) -> Result<Item, MutationError> {
        let owner = self.require_user()?;
        let new_item = ItemFields::new(title, category, priority).owned_by(owner.clone());

        let item = match self.backend.insert(new_item).await {
            Ok(item) => item,
            Err(e) => return Err(self.fail("create", e.into())),
        };
        if !item.is_owned_by(&owner) {
            tracing::warn!(id = %item.id, "discarded created task owned by another user");
            let err = StoreError::Remote("backend returned a task owned by another user".into());
            return Err(self.fail("create", err));
        }
        tracing::debug!(id = %item.id, "created task");

        let mut state = self.lock_for(&owner, "create")?;
        state.items.insert(0, item.clone());
        state.error = None;
        Ok(item)
    }

    /// Overwrite all editable fields of one of the user's tasks.
    ///
    /// An id that does not exist, or belongs to someone else, is `NotFound`.
    pub async fn update(
        &self,
        id: ItemId,
        title: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
    ) -> Result<Item, MutationError> {
        let owner = self.require_user()?;
        let fields = ItemFields::new(title, category, priority);

        let rows = match self.backend.update(id, owner.clone(), fields).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail("update", e.into())),
        };
        let Some(updated) = rows
            .into_iter()
            .find(|item| item.id == id && item.is_owned_by(&owner))
        else {
            return Err(self.fail("update", StoreError::NotFound(id)));
        };
        tracing::debug!(id = %id, "updated task");

        let mut state = self.lock_for(&owner, "update")?;
        if let Some(slot) = state.items.iter_mut().find(|item| item.id == id) {
            *slot = updated.clone();
        }
        state.error = None;
        Ok(updated)
    }

    /// Delete one of the user's tasks.
    pub async fn delete(&self, id: ItemId) -> Result<(), MutationError> {
        let owner = self.require_user()?;

        let rows = match self.backend.delete(id, owner.clone()).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail("delete", e.into())),
        };
        if rows.is_empty() {
            return Err(self.fail("delete", StoreError::NotFound(id)));
        }
        tracing::debug!(id = %id, "deleted task");

        let mut state = self.lock_for(&owner, "delete")?;
        state.items.retain(|item| item.id != id);
        state.error = None;
        Ok(())
    }

    /// Drop the local list and any recorded error. No remote call.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.items.clear();
        state.error = None;
    }

    /// Lock the state for applying a result fetched on behalf of `owner`.
    ///
    /// If the session has since moved to another user (or signed out) the
    /// result is stale: it is dropped, and neither the list nor the error
    /// slot is touched.
    fn lock_for(
        &self,
        owner: &UserId,
        op: &str,
    ) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        // Checked under the state lock so a concurrent clear() cannot slip in between.
        let state = self.lock();
        if self.session.user_id().as_ref() != Some(owner) {
            tracing::info!("{} result for {} dropped: session changed", op, owner);
            return Err(StoreError::Unauthenticated);
        }
        Ok(state)
    }

    fn require_user(&self) -> Result<UserId, StoreError> {
        self.session
            .user_id()
            .ok_or_else(|| self.fail("session", StoreError::Unauthenticated))
    }

    /// Record `err` for display and hand it back.
    fn fail(&self, op: &str, err: StoreError) -> StoreError {
        tracing::warn!("{} failed: {}", op, err);
        self.lock().error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
