// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tk_client::StoreError;
use tk_core::{validate_item_fields, ItemId, Priority};

use super::App;
use crate::cli::OutputFormat;
use crate::display::{format_item, format_items};
use crate::error::Result;

pub async fn list(priority: Option<Priority>, output: OutputFormat) -> Result<()> {
    let app = App::open().await?;
    let items = match priority {
        Some(Priority::High) => app.store.fetch_high_priority().await?,
        Some(priority) => app.store.fetch_by_priority(priority).await?,
        None => app.store.fetch_all().await?,
    };
    match output {
        OutputFormat::Text => println!("{}", format_items(&items)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
    }
    Ok(())
}

pub async fn add(title: &str, category: &str, priority: Priority) -> Result<()> {
    validate_item_fields(title, category)?;
    let app = App::open().await?;
    let item = app
        .store
        .create(title.trim(), category.trim(), priority)
        .await?;
    println!("Created {}", format_item(&item));
    Ok(())
}

/// Merge the given fields onto the current task, then write all of them back.
pub async fn edit(
    id: ItemId,
    title: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
) -> Result<()> {
    let app = App::open().await?;
    app.store.fetch_all().await?;
    let mut fields = app
        .store
        .find(id)
        .ok_or(StoreError::NotFound(id))?
        .fields();

    if let Some(title) = title {
        fields.title = title;
    }
    if let Some(category) = category {
        fields.category = category;
    }
    if let Some(priority) = priority {
        fields.priority = priority;
    }
    validate_item_fields(&fields.title, &fields.category)?;

    let item = app
        .store
        .update(id, fields.title.trim(), fields.category.trim(), fields.priority)
        .await?;
    println!("Updated {}", format_item(&item));
    Ok(())
}

pub async fn remove(id: ItemId) -> Result<()> {
    let app = App::open().await?;
    app.store.delete(id).await?;
    println!("Deleted task {}", id);
    Ok(())
}
