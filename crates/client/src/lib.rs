// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tk-client: session and task synchronization for the tk task manager.
//!
//! # Main Components
//!
//! - [`SessionManager`] - Tracks who is signed in and applies backend-pushed changes
//! - [`ItemStore`] - Owner-scoped local task list kept in step with the backend
//! - [`RestBackend`] - HTTP implementation of the backend traits
//! - [`ClientConfig`] - Backend URL, API key and session file location
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tk_client::{ClientConfig, ItemStore, RestBackend, SessionManager};
//!
//! let backend = Arc::new(RestBackend::new(ClientConfig::discover()?)?);
//! let sessions = SessionManager::new(Arc::clone(&backend));
//! let _watch = sessions.watch();
//! sessions.check_existing_session().await;
//!
//! let store = ItemStore::new(backend, sessions.context());
//! store.bootstrap().await?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod rest;
pub mod session;
pub mod store;

pub use backend::{AuthBackend, RemoteError, RemoteResult, TaskBackend, TaskQuery};
pub use config::{ClientConfig, ConfigError};
pub use error::{AuthError, FetchError, MutationError, StoreError};
pub use rest::RestBackend;
pub use session::{SessionContext, SessionManager, Subscription, WatchHandle};
pub use store::ItemStore;

#[cfg(test)]
mod test_helpers;
