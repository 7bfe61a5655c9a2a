// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collection endpoints for the tasks table.
//!
//! Filters use PostgREST operator syntax (`column=eq.value`). Writes ask
//! for `return=representation` so the affected rows come back; an empty
//! array is how a zero-row match shows up.

use reqwest::RequestBuilder;
use tk_core::{Item, ItemFields, ItemId, NewItem, UserId};

use super::{read_json, RestBackend};
use crate::backend::{BoxFuture, RemoteError, RemoteResult, TaskBackend, TaskQuery};

const RETURN_REPRESENTATION: &str = "return=representation";

/// Query parameters for an owner-scoped select, newest first.
pub(crate) fn select_params(query: &TaskQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", query.owner)),
    ];
    if let Some(priority) = query.priority {
        params.push(("priority", format!("eq.{}", priority)));
    }
    params.push(("order", "id.desc".to_string()));
    params
}

/// Query parameters restricting a write to one row of one owner.
pub(crate) fn row_params(id: ItemId, owner: &UserId) -> Vec<(&'static str, String)> {
    vec![
        ("id", format!("eq.{}", id)),
        ("user_id", format!("eq.{}", owner)),
    ]
}

impl RestBackend {
    /// Attach credentials to a collection request.
    async fn authorized(&self, request: RequestBuilder) -> RemoteResult<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(request.bearer_auth(token))
    }
}

impl TaskBackend for RestBackend {
    fn select(&self, query: TaskQuery) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            let request = self.http.get(self.table_url()).query(&select_params(&query));
            let response = self.send(self.authorized(request).await?).await?;
            read_json(response).await
        })
    }

    fn insert(&self, item: NewItem) -> BoxFuture<'_, RemoteResult<Item>> {
        Box::pin(async move {
            let request = self
                .http
                .post(self.table_url())
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&[item]);
            let response = self.send(self.authorized(request).await?).await?;
            let rows: Vec<Item> = read_json(response).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| RemoteError::Decode("insert returned no rows".to_string()))
        })
    }

    fn update(
        &self,
        id: ItemId,
        owner: UserId,
        fields: ItemFields,
    ) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            let request = self
                .http
                .patch(self.table_url())
                .query(&row_params(id, &owner))
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&fields);
            let response = self.send(self.authorized(request).await?).await?;
            read_json(response).await
        })
    }

    fn delete(&self, id: ItemId, owner: UserId) -> BoxFuture<'_, RemoteResult<Vec<Item>>> {
        Box::pin(async move {
            let request = self
                .http
                .delete(self.table_url())
                .query(&row_params(id, &owner))
                .header("Prefer", RETURN_REPRESENTATION);
            let response = self.send(self.authorized(request).await?).await?;
            read_json(response).await
        })
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
