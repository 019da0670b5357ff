//! # Transfer Commands
//!
//! CSV export of the current view, the PDF report, and the destructive CSV
//! restore.
//!
//! ## Restore Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  import_csv(bytes, confirmation)                                       │
//! │       │                                                                 │
//! │       ├── both gestures? ──✗──► ConfirmationRequired (file not read)   │
//! │       ├── parse_csv ───────✗──► ImportRejected (nothing changed)       │
//! │       ├── validate rows ───✗──► ImportRejected (nothing changed)       │
//! │       ├── replace_all (one transaction)                                │
//! │       │        └──✗──► ImportFailed, rolled back                       │
//! │       ▼                                                                 │
//! │  ImportReport { removed, inserted }                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{error, info, warn};

use inventory_core::validation::validate_import_rows;
use inventory_core::{ImportConfirmation, InventoryFilter};
use inventory_db::DbError;
use inventory_export::{CSV_MIME, PDF_MIME};

use super::inventory::view;
use super::{CommandOutcome, CommandResult};
use crate::error::{ApiError, ErrorCode};
use crate::session::Session;

/// A rendered file ready to be saved or downloaded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size: usize,
    /// Rows included.
    pub rows: usize,
}

impl ExportFile {
    fn new(file_name: &str, mime: &str, bytes: Vec<u8>, rows: usize) -> Self {
        ExportFile {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            size: bytes.len(),
            bytes,
            rows,
        }
    }
}

/// Outcome of a completed restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub removed: u64,
    pub inserted: u64,
}

/// Exports the filtered view as `inventory.csv`.
pub async fn export_csv(session: &Session, filter: &InventoryFilter) -> CommandResult<ExportFile> {
    session.require_admin("export csv")?;

    let items = view(session, filter).await?;
    let bytes = inventory_export::export_csv(&items)?;
    info!(rows = items.len(), bytes = bytes.len(), "CSV exported");

    let file = ExportFile::new("inventory.csv", CSV_MIME, bytes, items.len());
    Ok(CommandOutcome::new(format!("Exported {} row(s)", file.rows), file))
}

/// Renders the filtered view as `inventory.pdf`.
pub async fn export_pdf(session: &Session, filter: &InventoryFilter) -> CommandResult<ExportFile> {
    session.require_admin("export pdf")?;

    let items = view(session, filter).await?;
    let bytes = inventory_export::render_pdf(&items)?;
    info!(rows = items.len(), bytes = bytes.len(), "PDF report rendered");

    let file = ExportFile::new("inventory.pdf", PDF_MIME, bytes, items.len());
    Ok(CommandOutcome::new(format!("Report with {} row(s)", file.rows), file))
}

/// Replaces the whole inventory with the contents of a CSV file.
///
/// Runs only when both confirmation gestures are present. The file is fully
/// parsed and validated before anything is deleted, and the swap itself is
/// a single transaction: the inventory is either the file's rows or exactly
/// what it was before.
pub async fn import_csv(
    session: &Session,
    bytes: &[u8],
    confirmation: ImportConfirmation,
) -> CommandResult<ImportReport> {
    session.require_admin("import csv")?;

    if !confirmation.is_confirmed() {
        return Err(ApiError::confirmation_required(
            "Import needs both the import request and the overwrite confirmation",
        ));
    }

    let rows = inventory_export::parse_csv(bytes)?;

    let allowed = if session.config().import_enforces_categories {
        Some(import_categories(session).await?)
    } else {
        None
    };
    validate_import_rows(&rows, allowed.as_deref()).map_err(|e| {
        warn!(error = %e, "Import file rejected");
        ApiError::new(ErrorCode::ImportRejected, e.to_string())
    })?;

    let summary = session
        .db()
        .inventory()
        .replace_all(&rows)
        .await
        .map_err(import_failure)?;

    let report = ImportReport {
        removed: summary.removed,
        inserted: summary.inserted,
    };
    Ok(CommandOutcome::new(
        format!(
            "Inventory replaced: {} removed, {} imported",
            report.removed, report.inserted
        ),
        report,
    ))
}

/// Categories a restored row may use: the catalog plus every category
/// already stored, so a file exported after free-text updates restores as is.
async fn import_categories(session: &Session) -> Result<Vec<String>, ApiError> {
    let mut allowed = session.config().categories.clone();
    for category in session.db().inventory().categories().await? {
        if !allowed.contains(&category) {
            allowed.push(category);
        }
    }
    Ok(allowed)
}

fn import_failure(err: DbError) -> ApiError {
    if err.is_connection_error() {
        return ApiError::from(err);
    }
    error!(error = %err, "Import rolled back");
    ApiError::new(
        ErrorCode::ImportFailed,
        format!("Import failed, inventory left unchanged: {}", err),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::*;
    use inventory_core::{ItemChanges, NewInventoryItem};

    async fn stocked_session() -> Session {
        let session = admin_session().await;
        for (name, category, quantity) in [
            ("Laptop, 14\"", "Electronics", 4),
            ("Desk", "Furniture", 15),
            ("Monitor", "Electronics", 30),
        ] {
            session
                .db()
                .inventory()
                .add_item(&NewInventoryItem {
                    item_name: name.to_string(),
                    category: category.to_string(),
                    quantity,
                })
                .await
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_export_then_restore_reproduces_rows() {
        let session = stocked_session().await;
        let before = session.db().inventory().list(&InventoryFilter::all()).await.unwrap();

        let exported = export_csv(&session, &InventoryFilter::all()).await.unwrap().data;
        assert_eq!(exported.file_name, "inventory.csv");
        assert_eq!(exported.mime, "text/csv");
        assert_eq!(exported.rows, 3);

        session.db().inventory().delete("A002").await.unwrap();

        let report = import_csv(&session, &exported.bytes, ImportConfirmation::confirmed())
            .await
            .unwrap()
            .data;
        assert_eq!(report, ImportReport { removed: 2, inserted: 3 });

        let after = session.db().inventory().list(&InventoryFilter::all()).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_restore_keeps_categories_set_by_update() {
        let session = stocked_session().await;
        assert!(session.config().import_enforces_categories);
        session
            .db()
            .inventory()
            .update(
                "A002",
                &ItemChanges {
                    item_name: "Desk".to_string(),
                    category: "Office".to_string(),
                    quantity: 15,
                },
            )
            .await
            .unwrap();
        let before = session.db().inventory().list(&InventoryFilter::all()).await.unwrap();

        let exported = export_csv(&session, &InventoryFilter::all()).await.unwrap().data;
        let report = import_csv(&session, &exported.bytes, ImportConfirmation::confirmed())
            .await
            .unwrap()
            .data;
        assert_eq!(report, ImportReport { removed: 3, inserted: 3 });

        let after = session.db().inventory().list(&InventoryFilter::all()).await.unwrap();
        assert_eq!(after, before);
        assert_eq!(after[1].category, "Office");
    }

    #[tokio::test]
    async fn test_rejected_row_is_numbered_by_record() {
        let session = stocked_session().await;
        // The quoted name spans two file lines; the duplicate is still row 3.
        let csv = b"item_code,item_name,category,quantity\n\
B001,\"Shelf\nunit\",Furniture,1\n\
B002,Stool,Furniture,2\n\
B001,Bench,Furniture,3\n";
        let err = import_csv(&session, csv, ImportConfirmation::confirmed())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportRejected);
        assert!(err.message.starts_with("row 3:"), "{}", err.message);
        assert_eq!(session.db().inventory().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_export_follows_filter() {
        let session = stocked_session().await;
        let filter = InventoryFilter::all().in_category("Electronics");
        let exported = export_csv(&session, &filter).await.unwrap().data;
        let rows = inventory_export::parse_csv(&exported.bytes).unwrap();
        let codes: Vec<&str> = rows.iter().map(|r| r.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A001", "A003"]);
    }

    #[tokio::test]
    async fn test_import_without_both_confirmations_changes_nothing() {
        let session = stocked_session().await;
        let csv = b"item_code,item_name,category,quantity\nB001,Chair,Furniture,3\n";

        for confirmation in [
            ImportConfirmation::default(),
            ImportConfirmation {
                import_requested: true,
                overwrite_confirmed: false,
            },
            ImportConfirmation {
                import_requested: false,
                overwrite_confirmed: true,
            },
        ] {
            let err = import_csv(&session, csv, confirmation).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        }
        assert_eq!(session.db().inventory().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected_before_delete() {
        let session = stocked_session().await;

        let bad_quantity = b"item_code,item_name,category,quantity\nB001,Chair,Furniture,lots\n";
        let err = import_csv(&session, bad_quantity, ImportConfirmation::confirmed())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportRejected);

        let duplicate = b"item_code,item_name,category,quantity\nB001,Chair,Furniture,1\nB001,Stool,Furniture,2\n";
        let err = import_csv(&session, duplicate, ImportConfirmation::confirmed())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportRejected);
        assert!(err.message.contains("row 2"));

        let unknown_category = b"item_code,item_name,category,quantity\nB001,Chair,Garden,1\n";
        let err = import_csv(&session, unknown_category, ImportConfirmation::confirmed())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportRejected);

        assert_eq!(session.db().inventory().count().await.unwrap(), 3);
        assert!(session.db().inventory().get("A001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pdf_export() {
        let session = stocked_session().await;
        let report = export_pdf(&session, &InventoryFilter::all()).await.unwrap().data;
        assert_eq!(report.file_name, "inventory.pdf");
        assert_eq!(report.mime, "application/pdf");
        assert!(report.bytes.starts_with(b"%PDF-"));
        assert_eq!(report.size, report.bytes.len());
    }

    #[tokio::test]
    async fn test_transfers_need_admin() {
        let mut session = session().await;
        session.login(STAFF, STAFF_PASSWORD).await.unwrap();

        let err = export_csv(&session, &InventoryFilter::all()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);

        let err = import_csv(&session, b"", ImportConfirmation::confirmed())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }
}
