//! # inventory-core: Pure Domain Logic for the Inventory Manager
//!
//! This crate holds everything about an inventory record that can be decided
//! without touching a database, a file or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory Manager Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation Shell (browser / CLI)                 │   │
//! │  │   Login ──► Filter ──► Add / Update / Delete ──► Export         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ inventory-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   code    │  │ validation│                  │   │
//! │  │   │   Item    │  │  A001 →   │  │  rules    │                  │   │
//! │  │   │  History  │  │  A002 ... │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          inventory-db / inventory-export                        │   │
//! │  │      SQLite repositories, CSV and PDF encoders                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, history and log entries, identity)
//! - [`code`] - Sequential item code allocation (`A001`, `A002`, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Input and bulk-import validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inventory_core::code::next_item_code;
//!
//! assert_eq!(next_item_code(None).unwrap().as_str(), "A001");
//! assert_eq!(next_item_code(Some("A007")).unwrap().as_str(), "A008");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod code;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use code::{next_item_code, ItemCode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Items with a quantity strictly below this value are "low stock".
///
/// The predicate is computed at read time and never stored.
pub const LOW_STOCK_THRESHOLD: i64 = 15;

/// Category filter value meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All";

/// Categories offered on the Add-Item form when nothing else is configured.
pub const DEFAULT_CATEGORIES: &[&str] = &["Electronics", "Furniture", "Consumable", "Other"];

/// Action literal recorded in the deletion history.
pub const DELETE_ACTION: &str = "DELETE";
