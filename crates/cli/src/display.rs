// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tk_core::{Item, Priority};

/// Short marker shown before each task.
pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!",
        Priority::Medium => "! ",
        Priority::Low => "  ",
    }
}

/// One line per task: `[id] marker title (category)`.
pub fn format_item(item: &Item) -> String {
    format!(
        "[{}] {} {} ({})",
        item.id,
        priority_marker(item.priority),
        item.title,
        item.category
    )
}

/// Render a list of tasks, or a placeholder when there are none.
pub fn format_items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No tasks.".to_string();
    }
    items
        .iter()
        .map(format_item)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
