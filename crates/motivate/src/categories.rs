// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `motivate categories` and `motivate toggle` commands.

use std::sync::Arc;

use motivate_acquire::{CategoryPreferenceStore, ReloadBroadcaster, load_selection};
use motivate_config::MotivateConfig;
use motivate_core::{Category, CategorySelection, MotivateError};
use motivate_remote::{BackendClient, CategoryCatalog};

use crate::app::AppContext;

/// Lists the backend catalog, marking categories in the persisted filter.
pub async fn run_categories(config: &MotivateConfig) -> Result<(), MotivateError> {
    let catalog = CategoryCatalog::new(BackendClient::from_config(&config.backend)?);
    let categories = catalog.fetch_all().await?;

    let ctx = AppContext::open(config).await?;
    let selection = load_selection(ctx.selections.as_ref()).await;
    print!("{}", render_catalog(&categories, &selection));
    ctx.close().await
}

/// Flips each id in order, then flushes so the change is durable before exit.
pub async fn run_toggle(config: &MotivateConfig, ids: &[i64]) -> Result<(), MotivateError> {
    let ctx = AppContext::open(config).await?;
    let store = CategoryPreferenceStore::from_config(
        ctx.selections.clone(),
        // No surface runs in this process. A running widget sees the saved
        // revision through its own watcher.
        Arc::new(ReloadBroadcaster::new()),
        &config.preferences,
    );
    store.load().await;

    for &id in ids {
        let selected = store.toggle(id);
        println!(
            "category {id}: {}",
            if selected { "selected" } else { "not selected" }
        );
    }

    let selection = store.selection();
    store.shutdown().await;
    if selection.is_empty() {
        println!("no categories selected: images are chosen from all categories");
    }
    ctx.close().await
}

fn render_catalog(categories: &[Category], selection: &CategorySelection) -> String {
    if categories.is_empty() {
        return "no categories available\n".to_string();
    }
    let mut out = String::new();
    for category in categories {
        let mark = if selection.contains(category.id) { "x" } else { " " };
        out.push_str(&format!("[{mark}] {:>4}  {}", category.id, category.name));
        if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!(" - {description}"));
        }
        out.push('\n');
    }
    if selection.is_empty() {
        out.push_str("(no filter: all categories)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, description: Option<&str>) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn marks_selected_categories() {
        let rendered = render_catalog(
            &[
                category(1, "Discipline", None),
                category(2, "Focus", Some("Stay on task")),
            ],
            &CategorySelection::from_ids([2]),
        );
        assert!(rendered.contains("[ ]    1  Discipline\n"));
        assert!(rendered.contains("[x]    2  Focus - Stay on task\n"));
        assert!(!rendered.contains("no filter"));
    }

    #[test]
    fn empty_selection_is_reported_as_no_filter() {
        let rendered = render_catalog(&[category(1, "Focus", None)], &CategorySelection::new());
        assert!(rendered.ends_with("(no filter: all categories)\n"));
    }

    #[test]
    fn empty_catalog_message() {
        assert_eq!(
            render_catalog(&[], &CategorySelection::new()),
            "no categories available\n"
        );
    }
}
