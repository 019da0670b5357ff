//! # Commands Module
//!
//! Everything a presentation shell can ask the inventory manager to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (CommandOutcome, DTO helpers)
//! ├── inventory.rs  ◄─── list, add, update, delete, next code, dashboard
//! ├── transfer.rs   ◄─── CSV export / restore, PDF report
//! ├── audit.rs      ◄─── deletion history, update log
//! └── users.rs      ◄─── account creation
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shell gesture ──► command(&session, inputs)                           │
//! │                        │                                                │
//! │                        ├── session.require_admin(..)                    │
//! │                        ├── validate inputs (inventory-core)             │
//! │                        ├── repository call (inventory-db)               │
//! │                        ▼                                                │
//! │  Ok(CommandOutcome { message, data })  or  Err(ApiError { code, .. })  │
//! │                                                                         │
//! │  The shell redraws from `data` (or re-lists); nothing is cached here.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::ApiError;

pub mod audit;
pub mod inventory;
pub mod transfer;
pub mod users;

/// Successful command result: a message for the status line plus the data
/// to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome<T> {
    pub message: String,
    pub data: T,
}

impl<T> CommandOutcome<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        CommandOutcome {
            message: message.into(),
            data,
        }
    }
}

/// Result type of every command.
pub type CommandResult<T> = Result<CommandOutcome<T>, ApiError>;
