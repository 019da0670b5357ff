//! # Audit Repository
//!
//! Read side of the two audit tables.
//!
//! - `inventory_history`: one snapshot per deleted row, written by
//!   [`InventoryRepository::delete`](super::inventory::InventoryRepository::delete)
//! - `inventory_logs`: update records produced by an external writer. This
//!   system never inserts into it.
//!
//! Both are listed newest first.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use inventory_core::{InventoryHistoryEntry, InventoryLogEntry};

const HISTORY_COLUMNS: &str =
    "history_id, item_code, item_name, category, quantity, action, action_time";

const LOG_COLUMNS: &str = "log_id, item_code, action, old_name, new_name, old_category, \
     new_category, old_qty, new_qty, timestamp, \"user\"";

/// Repository for deletion history and the update log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// All deletion snapshots, newest first.
    pub async fn list_history(&self) -> DbResult<Vec<InventoryHistoryEntry>> {
        let entries = sqlx::query_as::<_, InventoryHistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM inventory_history \
             ORDER BY action_time DESC, history_id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = entries.len(), "Listed deletion history");
        Ok(entries)
    }

    /// Deletion snapshots for one item code, newest first.
    ///
    /// A code can appear more than once when it was restored from CSV and
    /// deleted again.
    pub async fn history_for(&self, item_code: &str) -> DbResult<Vec<InventoryHistoryEntry>> {
        let entries = sqlx::query_as::<_, InventoryHistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM inventory_history WHERE item_code = ?1 \
             ORDER BY action_time DESC, history_id DESC"
        ))
        .bind(item_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// All update-log records, newest first.
    pub async fn list_logs(&self) -> DbResult<Vec<InventoryLogEntry>> {
        let entries = sqlx::query_as::<_, InventoryLogEntry>(&format!(
            "SELECT {LOG_COLUMNS} FROM inventory_logs ORDER BY timestamp DESC, log_id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = entries.len(), "Listed update log");
        Ok(entries)
    }

    /// Update-log records for one item code, newest first.
    pub async fn logs_for(&self, item_code: &str) -> DbResult<Vec<InventoryLogEntry>> {
        let entries = sqlx::query_as::<_, InventoryLogEntry>(&format!(
            "SELECT {LOG_COLUMNS} FROM inventory_logs WHERE item_code = ?1 \
             ORDER BY timestamp DESC, log_id DESC"
        ))
        .bind(item_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
