//! # Domain Types
//!
//! Core domain types used throughout the inventory manager.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  InventoryItem  │   │ InventoryHistoryEntry│   │InventoryLogEntry│  │
//! │  │  ─────────────  │   │  ──────────────────  │   │ ─────────────── │  │
//! │  │  item_code (PK) │──►│  snapshot of item    │   │ old/new values  │  │
//! │  │  item_name      │   │  action = "DELETE"   │   │ timestamp, user │  │
//! │  │  category       │   │  action_time         │   │ (read only)     │  │
//! │  │  quantity       │   └──────────────────────┘   └─────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │ InventoryFilter │   │    Identity     │   │  ImportConfirmation  │  │
//! │  │ search, category│   │ username, role  │   │  both flags required │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `item_code` is the only identity an inventory row has. There are no
//! surrogate ids and no foreign keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ALL_CATEGORIES, LOW_STOCK_THRESHOLD};

// =============================================================================
// Inventory Item
// =============================================================================

/// A row of the inventory table.
///
/// Field names double as the CSV header (`item_code,item_name,category,quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    /// Business key, `A` + 3-digit sequence when allocated (e.g. `A001`).
    pub item_code: String,

    /// Display name. Expected to be non-empty, not enforced.
    pub item_name: String,

    /// Category. Checked against the catalog when the item is added,
    /// free text afterwards.
    pub category: String,

    /// Units on hand. Never negative.
    pub quantity: i64,
}

impl InventoryItem {
    /// Creates an item from its four fields.
    pub fn new(
        item_code: impl Into<String>,
        item_name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
    ) -> Self {
        InventoryItem {
            item_code: item_code.into(),
            item_name: item_name.into(),
            category: category.into(),
            quantity,
        }
    }

    /// Whether this item is below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }
}

/// Returns the low-stock subset of a view, preserving order.
pub fn low_stock(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).cloned().collect()
}

/// Fields submitted by the Add-Item form. The code is allocated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub category: String,
    pub quantity: i64,
}

/// Fields submitted by the Update form. The code itself is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemChanges {
    pub item_name: String,
    pub category: String,
    pub quantity: i64,
}

// =============================================================================
// Filter
// =============================================================================

/// Filter applied to the inventory view.
///
/// ## Semantics
/// - `search_term`: case-sensitive substring of `item_code` OR `item_name`.
///   An empty term does not filter.
/// - `category`: exact match. `None` or `"All"` does not filter.
/// - Both filters compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryFilter {
    pub search_term: Option<String>,
    pub category: Option<String>,
}

impl InventoryFilter {
    /// A filter that matches every row.
    pub fn all() -> Self {
        InventoryFilter::default()
    }

    /// Sets the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Sets the category.
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The effective search term, if any.
    pub fn effective_search(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }

    /// The effective category, if any.
    pub fn effective_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != ALL_CATEGORIES)
    }

    /// Evaluates the filter against one item.
    ///
    /// Mirrors the SQL the repository builds; used by tests and by callers
    /// that already hold a view in memory.
    pub fn matches(&self, item: &InventoryItem) -> bool {
        let search_ok = match self.effective_search() {
            Some(term) => item.item_code.contains(term) || item.item_name.contains(term),
            None => true,
        };
        let category_ok = match self.effective_category() {
            Some(category) => item.category == category,
            None => true,
        };
        search_ok && category_ok
    }
}

// =============================================================================
// Audit Entries
// =============================================================================

/// Snapshot of a row taken immediately before it was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryHistoryEntry {
    pub history_id: i64,
    pub item_code: String,
    pub item_name: String,
    pub category: String,
    pub quantity: i64,
    /// Always [`crate::DELETE_ACTION`] for entries written by this system.
    pub action: String,
    #[ts(as = "String")]
    pub action_time: DateTime<Utc>,
}

impl InventoryHistoryEntry {
    /// The item as it was before deletion.
    pub fn snapshot(&self) -> InventoryItem {
        InventoryItem::new(
            self.item_code.clone(),
            self.item_name.clone(),
            self.category.clone(),
            self.quantity,
        )
    }
}

/// A record of an update, written by an external writer and only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryLogEntry {
    pub log_id: i64,
    pub item_code: String,
    pub action: String,
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub old_category: Option<String>,
    pub new_category: Option<String>,
    pub old_qty: Option<i64>,
    pub new_qty: Option<i64>,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub user: Option<String>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Number of items per category (dashboard chart data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

// =============================================================================
// Users & Identity
// =============================================================================

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// May reach the inventory screens.
    Admin,
    /// Can sign in but is denied every inventory operation.
    Staff,
}

impl UserRole {
    /// Lowercase name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            _ => Err(crate::ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "staff".to_string()],
            }),
        }
    }
}

/// A stored account. The password is only ever kept as a PHC hash string.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Who is acting in a session, as established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
}

impl Identity {
    /// Whether this identity may use the inventory screens.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<UserRecord> for Identity {
    fn from(user: UserRecord) -> Self {
        Identity {
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        }
    }
}

// =============================================================================
// Destructive Action Confirmation
// =============================================================================

/// The two operator gestures a CSV restore needs.
///
/// Both must be true at the moment the restore is invoked. A gesture given on
/// an earlier request is not remembered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportConfirmation {
    /// The "Import CSV and Replace Inventory" button was pressed.
    pub import_requested: bool,
    /// The "Confirm to overwrite existing data" box is ticked.
    pub overwrite_confirmed: bool,
}

impl ImportConfirmation {
    /// Both gestures present.
    pub fn confirmed() -> Self {
        ImportConfirmation {
            import_requested: true,
            overwrite_confirmed: true,
        }
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.import_requested && self.overwrite_confirmed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<InventoryItem> {
        vec![
            InventoryItem::new("A001", "Laptop", "Electronics", 4),
            InventoryItem::new("A002", "Desk", "Furniture", 15),
            InventoryItem::new("A003", "Monitor A00", "Electronics", 30),
            InventoryItem::new("B100", "Stapler", "Other", 14),
        ]
    }

    #[test]
    fn test_low_stock_predicate() {
        let items = sample();
        let low = low_stock(&items);
        let codes: Vec<&str> = low.iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A001", "B100"]);

        for item in &items {
            assert_eq!(item.quantity < 15, low.contains(item));
        }
    }

    #[test]
    fn test_filter_composition() {
        let filter = InventoryFilter::all().search("A00").in_category("Electronics");
        let matched: Vec<_> = sample().into_iter().filter(|i| filter.matches(i)).collect();
        let codes: Vec<&str> = matched.iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A001", "A003"]);
    }

    #[test]
    fn test_filter_sentinels() {
        let filter = InventoryFilter::all().search("").in_category(ALL_CATEGORIES);
        assert_eq!(filter.effective_search(), None);
        assert_eq!(filter.effective_category(), None);
        assert!(sample().iter().all(|i| filter.matches(i)));
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let filter = InventoryFilter::all().search("laptop");
        assert!(!sample().iter().any(|i| filter.matches(i)));
    }

    #[test]
    fn test_import_confirmation_requires_both() {
        assert!(!ImportConfirmation::default().is_confirmed());
        assert!(!ImportConfirmation {
            import_requested: true,
            overwrite_confirmed: false
        }
        .is_confirmed());
        assert!(!ImportConfirmation {
            import_requested: false,
            overwrite_confirmed: true
        }
        .is_confirmed());
        assert!(ImportConfirmation::confirmed().is_confirmed());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("Admin".parse::<UserRole>().is_err());
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"admin\""
        );
    }
}
