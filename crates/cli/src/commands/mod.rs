// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod configure;
pub mod tasks;

use std::sync::Arc;

use tk_client::{
    ClientConfig, ItemStore, RestBackend, SessionManager, Subscription, WatchHandle,
};

use crate::error::Result;

/// Session manager and item store wired to the configured backend.
pub struct App {
    pub sessions: SessionManager<RestBackend>,
    pub store: ItemStore<RestBackend>,
    _watch: WatchHandle,
    _trace: Subscription,
}

impl App {
    /// Load config, restore any persisted session and start watching for pushes.
    pub async fn open() -> Result<Self> {
        let config = ClientConfig::discover()?;
        let backend = Arc::new(RestBackend::new(config)?);

        let sessions = SessionManager::new(Arc::clone(&backend));
        let watch = sessions.watch();
        let trace = sessions.subscribe(|session| tracing::debug!("session: {}", session));
        sessions.check_existing_session().await;

        let store = ItemStore::new(backend, sessions.context());
        Ok(App {
            sessions,
            store,
            _watch: watch,
            _trace: trace,
        })
    }
}
