// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task item types exchanged with the remote `tasks` collection.
//!
//! Rows are serialized with the column names the collection uses, so the
//! owner travels as `user_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::session::UserId;

/// Identifier assigned by the remote store. Higher ids are newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(ItemId)
            .map_err(|_| Error::InvalidItemId(s.to_string()))
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

/// A task as stored remotely and mirrored in the local list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    /// The user who created the task. Never changes after creation.
    #[serde(rename = "user_id")]
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// The editable fields of this item.
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            title: self.title.clone(),
            category: self.category.clone(),
            priority: self.priority,
        }
    }

    /// Returns true if this item belongs to `user`.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// Insert payload: everything except the remote-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub category: String,
    pub priority: Priority,
    #[serde(rename = "user_id")]
    pub owner: UserId,
}

/// Full-field update payload. The owner is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    pub title: String,
    pub category: String,
    pub priority: Priority,
}

impl ItemFields {
    pub fn new(title: impl Into<String>, category: impl Into<String>, priority: Priority) -> Self {
        ItemFields {
            title: title.into(),
            category: category.into(),
            priority,
        }
    }

    /// Attach an owner, producing an insert payload.
    pub fn owned_by(self, owner: UserId) -> NewItem {
        NewItem {
            title: self.title,
            category: self.category,
            priority: self.priority,
            owner,
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
