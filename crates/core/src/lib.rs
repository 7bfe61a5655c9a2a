// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tk-core: Shared data model for the tk task client
//!
//! This crate provides the task and session types exchanged with the
//! remote backend, plus the caller-side validation run before any
//! remote call is made.

pub mod error;
pub mod item;
pub mod session;
pub mod validate;

pub use error::{Error, Result};
pub use item::{Item, ItemFields, ItemId, NewItem, Priority};
pub use session::{AuthEvent, Session, User, UserId};
pub use validate::{validate_credentials, validate_item_fields, MIN_PASSWORD_LENGTH};
