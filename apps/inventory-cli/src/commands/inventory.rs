//! # Inventory Commands
//!
//! The inventory screen: filtered table, Add / Update / Delete forms, and
//! the dashboard figures.

use serde::{Deserialize, Serialize};
use tracing::debug;

use inventory_core::validation::{validate_changes, validate_new_item};
use inventory_core::{
    CategoryCount, InventoryFilter, InventoryHistoryEntry, InventoryItem, ItemChanges,
    NewInventoryItem, ALL_CATEGORIES, LOW_STOCK_THRESHOLD,
};

use super::{CommandOutcome, CommandResult};
use crate::error::ApiError;
use crate::session::Session;

/// Inventory row DTO for the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub item_code: String,
    pub item_name: String,
    pub category: String,
    pub quantity: i64,
    /// Highlighted in the table when true.
    pub low_stock: bool,
}

impl From<InventoryItem> for ItemDto {
    fn from(item: InventoryItem) -> Self {
        ItemDto {
            low_stock: item.is_low_stock(),
            item_code: item.item_code,
            item_name: item.item_name,
            category: item.category,
            quantity: item.quantity,
        }
    }
}

/// Dashboard figures for the current filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Rows in the whole table.
    pub total_items: i64,
    /// Rows in the filtered view.
    pub shown_items: usize,
    /// Low-stock rows of the filtered view.
    pub low_stock: Vec<ItemDto>,
    pub low_stock_threshold: i64,
    /// Items per category across the whole table.
    pub category_counts: Vec<CategoryCount>,
}

/// Reads the filtered view. Shared by listing and the exports.
///
/// Any search term is accepted; one that matches nothing yields an empty view.
pub(crate) async fn view(
    session: &Session,
    filter: &InventoryFilter,
) -> Result<Vec<InventoryItem>, ApiError> {
    Ok(session.db().inventory().list(filter).await?)
}

/// Lists the rows matching `filter`, in insertion order.
pub async fn list_items(session: &Session, filter: &InventoryFilter) -> CommandResult<Vec<ItemDto>> {
    session.require_admin("items list")?;

    let items = view(session, filter).await?;
    let count = items.len();
    let dtos: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();

    Ok(CommandOutcome::new(format!("{} item(s)", count), dtos))
}

/// Add-Item form submit.
pub async fn add_item(session: &Session, new_item: NewInventoryItem) -> CommandResult<ItemDto> {
    session.require_admin("items add")?;
    validate_new_item(&new_item, &session.config().categories)?;

    let item = session.db().inventory().add_item(&new_item).await?;
    let message = format!("Item {} added", item.item_code);
    Ok(CommandOutcome::new(message, ItemDto::from(item)))
}

/// Update form submit. The code never changes.
pub async fn update_item(
    session: &Session,
    item_code: &str,
    changes: ItemChanges,
) -> CommandResult<ItemDto> {
    session.require_admin("items update")?;
    validate_changes(&changes)?;

    let item = session.db().inventory().update(item_code, &changes).await?;
    Ok(CommandOutcome::new(
        format!("Item {} updated", item_code),
        ItemDto::from(item),
    ))
}

/// Delete button. Requires the operator's confirmation at call time.
///
/// Returns the snapshot written to the deletion history.
pub async fn delete_item(
    session: &Session,
    item_code: &str,
    confirmed: bool,
) -> CommandResult<InventoryHistoryEntry> {
    session.require_admin("items delete")?;
    if !confirmed {
        return Err(ApiError::confirmation_required(format!(
            "Deleting {} must be confirmed",
            item_code
        )));
    }

    let entry = session.db().inventory().delete(item_code).await?;
    Ok(CommandOutcome::new(format!("Item {} deleted", item_code), entry))
}

/// The code the Add form will most likely receive.
pub async fn next_code(session: &Session) -> CommandResult<String> {
    session.require_admin("items next-code")?;
    let code = session.db().inventory().peek_next_code().await?;
    Ok(CommandOutcome::new(
        format!("Next item code: {}", code),
        code.into_string(),
    ))
}

/// Options for the category filter dropdown: `"All"`, the configured
/// catalog, then any free-text categories found in the table.
pub async fn filter_categories(session: &Session) -> CommandResult<Vec<String>> {
    session.require_admin("items categories")?;

    let catalog = &session.config().categories;
    let stored = session.db().inventory().categories().await?;

    let mut options = Vec::with_capacity(1 + catalog.len() + stored.len());
    options.push(ALL_CATEGORIES.to_string());
    options.extend(catalog.iter().cloned());
    for category in stored {
        if !options.contains(&category) {
            options.push(category);
        }
    }

    debug!(count = options.len(), "Category options");
    Ok(CommandOutcome::new(format!("{} option(s)", options.len()), options))
}

/// Dashboard: totals, low-stock subset of the filtered view, category chart.
pub async fn summary(session: &Session, filter: &InventoryFilter) -> CommandResult<InventorySummary> {
    session.require_admin("items summary")?;

    let items = view(session, filter).await?;
    let repo = session.db().inventory();
    let total_items = repo.count().await?;
    let category_counts = repo.category_counts().await?;

    let low_stock: Vec<ItemDto> = inventory_core::low_stock(&items)
        .into_iter()
        .map(ItemDto::from)
        .collect();

    let message = format!(
        "{} of {} item(s) shown, {} low on stock",
        items.len(),
        total_items,
        low_stock.len()
    );
    Ok(CommandOutcome::new(
        message,
        InventorySummary {
            total_items,
            shown_items: items.len(),
            low_stock,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            category_counts,
        },
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
