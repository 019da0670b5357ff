//! # Repository Module
//!
//! Database repository implementations for the inventory manager.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Session command                                                       │
//! │       │                                                                 │
//! │       │  db.inventory().list(&filter)                                  │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── list(&self, filter)                                               │
//! │  ├── add_item(&self, new_item)   ← allocates the next code            │
//! │  ├── update(&self, code, changes)                                      │
//! │  ├── delete(&self, code)         ← history snapshot + delete          │
//! │  └── replace_all(&self, rows)    ← bulk restore                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  All SQL lives in this module; callers only see domain types.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Inventory rows, code allocation, bulk restore
//! - [`AuditRepository`](audit::AuditRepository) - Deletion history and update log (read side)
//! - [`UserRepository`](user::UserRepository) - Accounts and credential checks

pub mod audit;
pub mod inventory;
pub mod user;
