//! # inventory-export: CSV and PDF for the Inventory Manager
//!
//! Pure encoders over an already-filtered view. Nothing here touches the
//! database; the caller passes the exact rows the user is looking at.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InventoryRepository::list(&filter) ──► Vec<InventoryItem> (the view)  │
//! │                                              │                          │
//! │                      ┌───────────────────────┴───────┐                 │
//! │                      ▼                               ▼                 │
//! │             transfer::export_csv           report::render_pdf          │
//! │                      │                               │                 │
//! │                      ▼                               ▼                 │
//! │             inventory_export.csv           inventory_report.pdf        │
//! │                                                                         │
//! │  restore:  bytes ──► transfer::parse_csv ──► validate ──► replace_all  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`transfer`] - CSV encode/decode with the fixed header
//! - [`report`] - Paginated "Inventory Report" PDF
//! - [`error`] - Export error types

pub mod error;
pub mod report;
pub mod transfer;

pub use error::{ExportError, ExportResult};
pub use report::{render_pdf, PDF_MIME};
pub use transfer::{export_csv, parse_csv, CSV_HEADER, CSV_MIME};
