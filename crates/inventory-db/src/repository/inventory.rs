//! # Inventory Repository
//!
//! Database operations for the `inventory` table.
//!
//! ## Key Operations
//! - Filtered listing (substring search + category, insertion order)
//! - Add with sequential code allocation
//! - Update by code
//! - Delete with a history snapshot
//! - Bulk replace for CSV restore
//!
//! ## Code Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Add Item (one transaction)                           │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    UPDATE item_code_allocator SET allocations = allocations + 1        │
//! │       │   ← takes the write lock; a second session waits here          │
//! │       ▼                                                                 │
//! │    SELECT MAX(item_code) WHERE item_code GLOB 'A[0-9][0-9][0-9]'       │
//! │       │   None → A001, A007 → A008, A999 → CodeSpaceExhausted          │
//! │       ▼                                                                 │
//! │    INSERT INTO inventory (...)   ← PRIMARY KEY is the backstop         │
//! │    UPDATE item_code_allocator SET last_code = ...                      │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes that do not follow the `A` + 3 digits pattern (they can arrive via
//! CSV restore) are ignored when computing the next code.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use inventory_core::{
    next_item_code, CategoryCount, InventoryFilter, InventoryHistoryEntry, InventoryItem,
    ItemChanges, ItemCode, NewInventoryItem, DELETE_ACTION,
};

const ITEM_COLUMNS: &str = "item_code, item_name, category, quantity";

/// Largest allocator-shaped code currently stored.
const MAX_ALLOCATED_CODE_SQL: &str = "SELECT MAX(item_code) FROM inventory \
     WHERE item_code GLOB 'A[0-9][0-9][0-9]'";

/// Outcome of [`InventoryRepository::replace_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Rows that were in the table before the restore.
    pub removed: u64,
    /// Rows written from the file.
    pub inserted: u64,
}

/// Repository for inventory rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let added = repo.add_item(&new_item).await?;      // A001
/// let view = repo.list(&InventoryFilter::all()).await?;
/// let snapshot = repo.delete("A001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists the rows matching `filter`, in insertion order.
    ///
    /// ## Filter Semantics
    /// - search term: case-sensitive substring of `item_code` OR `item_name`
    ///   (`instr`, so `%` and `_` are literal characters)
    /// - category: exact match, `"All"` means no category filter
    /// - both given: AND
    ///
    /// Every user value is bound as a parameter.
    pub async fn list(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM inventory"));
        let mut has_where = false;

        if let Some(term) = filter.effective_search() {
            qb.push(" WHERE (instr(item_code, ")
                .push_bind(term.to_string())
                .push(") > 0 OR instr(item_name, ")
                .push_bind(term.to_string())
                .push(") > 0)");
            has_where = true;
        }

        if let Some(category) = filter.effective_category() {
            qb.push(if has_where { " AND " } else { " WHERE " })
                .push("category = ")
                .push_bind(category.to_string());
        }

        qb.push(" ORDER BY rowid");

        let items = qb
            .build_query_as::<InventoryItem>()
            .fetch_all(&self.pool)
            .await?;

        debug!(
            search = ?filter.effective_search(),
            category = ?filter.effective_category(),
            count = items.len(),
            "Listed inventory"
        );
        Ok(items)
    }

    /// Gets one row by its code.
    pub async fn get(&self, item_code: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory WHERE item_code = ?1"
        ))
        .bind(item_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Total number of rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Distinct categories currently in use, sorted.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM inventory ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    /// Number of rows per category, sorted by category.
    pub async fn category_counts(&self) -> DbResult<Vec<CategoryCount>> {
        let counts = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM inventory
            GROUP BY category
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Low-stock rows within the filtered view.
    pub async fn low_stock(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        let view = self.list(filter).await?;
        Ok(inventory_core::low_stock(&view))
    }

    /// The code the next [`add_item`](Self::add_item) would allocate, for
    /// display on the Add-Item form.
    ///
    /// Informational only: another session may take it first.
    pub async fn peek_next_code(&self) -> DbResult<ItemCode> {
        let max: Option<String> = sqlx::query_scalar(MAX_ALLOCATED_CODE_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(next_item_code(max.as_deref())?)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a row with a caller-chosen code.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the code already exists
    /// - `CheckViolation` if the quantity is negative
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO inventory (item_code, item_name, category, quantity) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&item.item_code)
        .bind(&item.item_name)
        .bind(&item.category)
        .bind(item.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&item.item_code))?;

        debug!(item_code = %item.item_code, "Inserted item");
        Ok(())
    }

    /// Adds an item under the next sequential code.
    ///
    /// Allocation and insert happen in one transaction (see module docs), so
    /// two concurrent adds never receive the same code.
    ///
    /// ## Errors
    /// - `Domain(CodeSpaceExhausted)` once `A999` is taken
    /// - `UniqueViolation` if the allocated code collides anyway
    pub async fn add_item(&self, new_item: &NewInventoryItem) -> DbResult<InventoryItem> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE item_code_allocator SET allocations = allocations + 1 WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        let max: Option<String> = sqlx::query_scalar(MAX_ALLOCATED_CODE_SQL)
            .fetch_one(&mut *tx)
            .await?;

        let code = next_item_code(max.as_deref())?;
        let item = InventoryItem::new(
            code.as_str(),
            new_item.item_name.clone(),
            new_item.category.clone(),
            new_item.quantity,
        );

        sqlx::query(
            "INSERT INTO inventory (item_code, item_name, category, quantity) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&item.item_code)
        .bind(&item.item_name)
        .bind(&item.category)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&item.item_code))?;

        sqlx::query("UPDATE item_code_allocator SET last_code = ?1 WHERE id = 1")
            .bind(&item.item_code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(item_code = %item.item_code, category = %item.category, "Item added");
        Ok(item)
    }

    /// Overwrites name, category and quantity of an existing row.
    ///
    /// ## Errors
    /// - `NotFound` if no row has `item_code`
    pub async fn update(&self, item_code: &str, changes: &ItemChanges) -> DbResult<InventoryItem> {
        let result = sqlx::query(
            "UPDATE inventory SET item_name = ?2, category = ?3, quantity = ?4 \
             WHERE item_code = ?1",
        )
        .bind(item_code)
        .bind(&changes.item_name)
        .bind(&changes.category)
        .bind(changes.quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item_code));
        }

        info!(item_code = %item_code, quantity = changes.quantity, "Item updated");
        Ok(InventoryItem::new(
            item_code,
            changes.item_name.clone(),
            changes.category.clone(),
            changes.quantity,
        ))
    }

    /// Deletes a row, first copying it into `inventory_history`.
    ///
    /// ## Transaction
    /// ```text
    /// BEGIN
    ///   SELECT row            ── missing → NotFound, nothing written
    ///   INSERT history        ── action = 'DELETE', action_time = now
    ///   DELETE row
    /// COMMIT                  ── both or neither
    /// ```
    pub async fn delete(&self, item_code: &str) -> DbResult<InventoryHistoryEntry> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory WHERE item_code = ?1"
        ))
        .bind(item_code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Item", item_code))?;

        let entry = sqlx::query_as::<_, InventoryHistoryEntry>(
            r#"
            INSERT INTO inventory_history
                (item_code, item_name, category, quantity, action, action_time)
            VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            RETURNING history_id, item_code, item_name, category, quantity, action, action_time
            "#,
        )
        .bind(&item.item_code)
        .bind(&item.item_name)
        .bind(&item.category)
        .bind(item.quantity)
        .bind(DELETE_ACTION)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM inventory WHERE item_code = ?1")
            .bind(item_code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            item_code = %item_code,
            history_id = entry.history_id,
            "Item deleted, snapshot recorded"
        );
        Ok(entry)
    }

    /// Replaces the whole table with `rows`.
    ///
    /// Runs as one transaction: if any row is refused by the database the
    /// previous contents are left untouched. No history is written.
    pub async fn replace_all(&self, rows: &[InventoryItem]) -> DbResult<ReplaceSummary> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM inventory")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for (index, item) in rows.iter().enumerate() {
            let inserted = sqlx::query(
                "INSERT INTO inventory (item_code, item_name, category, quantity) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&item.item_code)
            .bind(&item.item_name)
            .bind(&item.category)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await;

            if let Err(e) = inserted {
                let err = DbError::from(e).with_duplicate_value(&item.item_code);
                warn!(row = index + 1, error = %err, "Restore aborted, rolling back");
                return Err(err);
            }
        }

        tx.commit().await?;

        let summary = ReplaceSummary {
            removed,
            inserted: rows.len() as u64,
        };
        info!(
            removed = summary.removed,
            inserted = summary.inserted,
            "Inventory replaced"
        );
        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use inventory_core::CoreError;

    async fn repo() -> (Database, InventoryRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();
        (db, repo)
    }

    fn new_item(name: &str, category: &str, quantity: i64) -> NewInventoryItem {
        NewInventoryItem {
            item_name: name.to_string(),
            category: category.to_string(),
            quantity,
        }
    }

    fn codes(items: &[InventoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.item_code.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_allocates_sequential_codes() {
        let (_db, repo) = repo().await;

        assert_eq!(repo.peek_next_code().await.unwrap().as_str(), "A001");

        let first = repo.add_item(&new_item("Laptop", "Electronics", 5)).await.unwrap();
        let second = repo.add_item(&new_item("Desk", "Furniture", 20)).await.unwrap();

        assert_eq!(first.item_code, "A001");
        assert_eq!(second.item_code, "A002");
        assert_eq!(repo.peek_next_code().await.unwrap().as_str(), "A003");
    }

    #[tokio::test]
    async fn test_add_continues_after_max_code() {
        let (_db, repo) = repo().await;
        repo.insert(&InventoryItem::new("A007", "Chair", "Furniture", 3))
            .await
            .unwrap();
        // Non-allocator codes never drive the sequence.
        repo.insert(&InventoryItem::new("ZZZ-1", "Imported", "Other", 1))
            .await
            .unwrap();

        let added = repo.add_item(&new_item("Stool", "Furniture", 2)).await.unwrap();
        assert_eq!(added.item_code, "A008");
    }

    #[tokio::test]
    async fn test_add_stops_at_a999() {
        let (_db, repo) = repo().await;
        repo.insert(&InventoryItem::new("A999", "Last", "Other", 1))
            .await
            .unwrap();

        let err = repo.add_item(&new_item("Overflow", "Other", 1)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::CodeSpaceExhausted { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    /// A file database removed again when the test ends.
    struct TempDbFile(std::path::PathBuf);

    impl TempDbFile {
        fn new(name: &str) -> Self {
            let nanos = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            TempDbFile(std::env::temp_dir().join(format!(
                "{}-{}-{}.db",
                name,
                std::process::id(),
                nanos
            )))
        }
    }

    impl Drop for TempDbFile {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let mut path = self.0.clone().into_os_string();
                path.push(suffix);
                std::fs::remove_file(path).ok();
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_from_two_sessions_get_distinct_codes() {
        let file = TempDbFile::new("inventory-concurrent-adds");
        // Two independent pools on one file, like two logged-in sessions.
        let first = Database::new(DbConfig::new(file.0.clone()).max_connections(2))
            .await
            .unwrap();
        let second = Database::new(DbConfig::new(file.0.clone()).max_connections(2))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = if i % 2 == 0 {
                first.inventory()
            } else {
                second.inventory()
            };
            handles.push(tokio::spawn(async move {
                repo.add_item(&new_item(&format!("Item {i}"), "Other", i))
                    .await
                    .map(|item| item.item_code)
            }));
        }

        let mut allocated = Vec::new();
        for handle in handles {
            allocated.push(handle.await.unwrap().unwrap());
        }
        allocated.sort();
        allocated.dedup();
        assert_eq!(allocated.len(), 20);
        assert_eq!(allocated.first().map(String::as_str), Some("A001"));
        assert_eq!(allocated.last().map(String::as_str), Some("A020"));
        assert_eq!(second.inventory().count().await.unwrap(), 20);

        first.close().await;
        second.close().await;
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_is_rejected() {
        let (_db, repo) = repo().await;
        let item = InventoryItem::new("A001", "Laptop", "Electronics", 5);
        repo.insert(&item).await.unwrap();

        let err = repo.insert(&item).await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "A001"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_negative_quantity_is_rejected_by_schema() {
        let (_db, repo) = repo().await;
        let err = repo
            .insert(&InventoryItem::new("A001", "Laptop", "Electronics", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_compose() {
        let (_db, repo) = repo().await;
        for item in [
            InventoryItem::new("A001", "Laptop", "Electronics", 4),
            InventoryItem::new("A002", "Desk", "Furniture", 15),
            InventoryItem::new("B001", "Cable A00", "Electronics", 40),
            InventoryItem::new("B002", "Paper", "Consumable", 100),
        ] {
            repo.insert(&item).await.unwrap();
        }

        let all = repo.list(&InventoryFilter::all()).await.unwrap();
        assert_eq!(codes(&all), vec!["A001", "A002", "B001", "B002"]);

        let search = repo.list(&InventoryFilter::all().search("A00")).await.unwrap();
        assert_eq!(codes(&search), vec!["A001", "A002", "B001"]);

        let both = repo
            .list(&InventoryFilter::all().search("A00").in_category("Electronics"))
            .await
            .unwrap();
        assert_eq!(codes(&both), vec!["A001", "B001"]);

        let sentinel = repo
            .list(&InventoryFilter::all().search("").in_category("All"))
            .await
            .unwrap();
        assert_eq!(sentinel.len(), 4);

        let case = repo.list(&InventoryFilter::all().search("laptop")).await.unwrap();
        assert!(case.is_empty());

        // Wildcards are literal characters.
        let literal = repo.list(&InventoryFilter::all().search("%")).await.unwrap();
        assert!(literal.is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let (_db, repo) = repo().await;
        let added = repo.add_item(&new_item("Laptop", "Electronics", 5)).await.unwrap();

        let changes = ItemChanges {
            item_name: "Laptop Pro".to_string(),
            category: "Hardware".to_string(),
            quantity: 9,
        };
        repo.update(&added.item_code, &changes).await.unwrap();

        let stored = repo.get(&added.item_code).await.unwrap().unwrap();
        assert_eq!(stored, InventoryItem::new("A001", "Laptop Pro", "Hardware", 9));
    }

    #[tokio::test]
    async fn test_update_missing_code_is_not_found() {
        let (_db, repo) = repo().await;
        let changes = ItemChanges {
            item_name: "Ghost".to_string(),
            category: "Other".to_string(),
            quantity: 1,
        };
        let err = repo.update("A404", &changes).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_records_snapshot() {
        let (db, repo) = repo().await;
        let added = repo.add_item(&new_item("Laptop", "Electronics", 5)).await.unwrap();

        let entry = repo.delete(&added.item_code).await.unwrap();
        assert_eq!(entry.snapshot(), added);
        assert_eq!(entry.action, DELETE_ACTION);
        assert!(repo.get(&added.item_code).await.unwrap().is_none());

        let history = db.audit().list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], entry);
    }

    #[tokio::test]
    async fn test_delete_missing_code_writes_nothing() {
        let (db, repo) = repo().await;
        let err = repo.delete("A404").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(db.audit().list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_swaps_contents() {
        let (db, repo) = repo().await;
        repo.add_item(&new_item("Old", "Other", 1)).await.unwrap();

        let rows = vec![
            InventoryItem::new("X1", "Imported One", "Electronics", 2),
            InventoryItem::new("X2", "Imported Two", "Furniture", 30),
        ];
        let summary = repo.replace_all(&rows).await.unwrap();
        assert_eq!(summary, ReplaceSummary { removed: 1, inserted: 2 });

        let view = repo.list(&InventoryFilter::all()).await.unwrap();
        assert_eq!(view, rows);
        // Restore never writes history.
        assert!(db.audit().list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_rolls_back_on_bad_row() {
        let (_db, repo) = repo().await;
        let original = repo.add_item(&new_item("Keep me", "Other", 1)).await.unwrap();

        let rows = vec![
            InventoryItem::new("X1", "Fine", "Other", 1),
            InventoryItem::new("X1", "Duplicate", "Other", 1),
        ];
        assert!(repo.replace_all(&rows).await.is_err());

        let view = repo.list(&InventoryFilter::all()).await.unwrap();
        assert_eq!(view, vec![original]);
    }

    #[tokio::test]
    async fn test_categories_and_counts() {
        let (_db, repo) = repo().await;
        repo.add_item(&new_item("Laptop", "Electronics", 5)).await.unwrap();
        repo.add_item(&new_item("Mouse", "Electronics", 50)).await.unwrap();
        repo.add_item(&new_item("Desk", "Furniture", 2)).await.unwrap();

        assert_eq!(
            repo.categories().await.unwrap(),
            vec!["Electronics".to_string(), "Furniture".to_string()]
        );

        let counts = repo.category_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                CategoryCount { category: "Electronics".to_string(), count: 2 },
                CategoryCount { category: "Furniture".to_string(), count: 1 },
            ]
        );

        let low = repo.low_stock(&InventoryFilter::all()).await.unwrap();
        assert_eq!(codes(&low), vec!["A001", "A003"]);
    }
}
