//! # Command Line
//!
//! One invocation runs one command against one session.
//!
//! ```text
//! inventory [--config FILE] [--database FILE] [-u USER --password PW] [--json]
//!     users add     <username> --new-password PW [--display-name N] [--role admin|staff]
//!     items list    [-s TERM] [-c CATEGORY]
//!     items add     --name N --category C --quantity Q
//!     items update  <code> [--name N] [--category C] [--quantity Q]
//!     items delete  <code> --yes
//!     items next-code | categories | summary [-s TERM] [-c CATEGORY]
//!     export csv|pdf [-s TERM] [-c CATEGORY] [--out FILE]
//!     import csv    <file> --import --confirm-overwrite
//!     audit history|logs [--code CODE]
//! ```
//!
//! Credentials may come from `INVENTORY_USERNAME` / `INVENTORY_PASSWORD`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use inventory_core::{
    ImportConfirmation, InventoryFilter, InventoryItem, ItemChanges, NewInventoryItem, UserRole,
    ALL_CATEGORIES,
};

#[derive(Debug, Parser)]
#[command(name = "inventory")]
#[command(about = "Inventory manager: items, CSV transfer, PDF reports")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ./inventory.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the configuration
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Account to log in with
    #[arg(short, long, global = true, env = "INVENTORY_USERNAME")]
    pub username: Option<String>,

    /// Password for --username
    #[arg(long, global = true, env = "INVENTORY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Account management
    #[command(subcommand)]
    Users(UsersCommand),

    /// View and edit inventory items
    #[command(subcommand)]
    Items(ItemsCommand),

    /// Export the current view
    #[command(subcommand)]
    Export(ExportCommand),

    /// Replace the inventory from a file
    #[command(subcommand)]
    Import(ImportCommand),

    /// Deletion history and update log
    #[command(subcommand)]
    Audit(AuditCommand),
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Create an account (the first one needs no login)
    Add {
        username: String,

        /// Password of the new account
        #[arg(long)]
        new_password: String,

        #[arg(long, default_value = "")]
        display_name: String,

        #[arg(long, value_enum, default_value_t = RoleArg::Staff)]
        role: RoleArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    Staff,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Staff => UserRole::Staff,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List items matching the filter
    List(FilterArgs),

    /// Add an item; its code is assigned automatically
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Change an item's name, category or quantity
    Update {
        code: String,

        #[command(flatten)]
        patch: ItemPatch,
    },

    /// Delete an item (a snapshot goes to the history)
    Delete {
        code: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show the code the next added item will most likely get
    NextCode,

    /// Options of the category filter
    Categories,

    /// Totals, low-stock items and per-category counts
    Summary(FilterArgs),
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Write the view as CSV
    Csv {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value = "inventory.csv")]
        out: PathBuf,
    },

    /// Write the view as a PDF report
    Pdf {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value = "inventory.pdf")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Replace ALL inventory rows with the rows of a CSV file
    Csv {
        file: PathBuf,

        /// Request the import
        #[arg(long)]
        import: bool,

        /// Confirm that existing data is overwritten
        #[arg(long)]
        confirm_overwrite: bool,
    },
}

impl ImportCommand {
    pub fn confirmation(&self) -> ImportConfirmation {
        match self {
            ImportCommand::Csv {
                import,
                confirm_overwrite,
                ..
            } => ImportConfirmation {
                import_requested: *import,
                overwrite_confirmed: *confirm_overwrite,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Snapshots of deleted items
    History {
        #[arg(long)]
        code: Option<String>,
    },

    /// Update log entries
    Logs {
        #[arg(long)]
        code: Option<String>,
    },
}

/// Search box and category dropdown.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Substring of the item code or name (case-sensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category, or "All"
    #[arg(short, long, default_value = ALL_CATEGORIES)]
    pub category: String,
}

impl From<FilterArgs> for InventoryFilter {
    fn from(args: FilterArgs) -> Self {
        InventoryFilter {
            search_term: args.search,
            category: Some(args.category),
        }
    }
}

/// Fields of the Add form as typed on the command line.
pub fn new_item(name: String, category: String, quantity: i64) -> NewInventoryItem {
    NewInventoryItem {
        item_name: name,
        category,
        quantity,
    }
}

/// Update form fields; anything omitted keeps its current value.
#[derive(Debug, Clone, Default, Args)]
pub struct ItemPatch {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,
}

impl ItemPatch {
    /// Fills the omitted fields from `current`.
    pub fn apply_to(self, current: &InventoryItem) -> ItemChanges {
        ItemChanges {
            item_name: self.name.unwrap_or_else(|| current.item_name.clone()),
            category: self.category.unwrap_or_else(|| current.category.clone()),
            quantity: self.quantity.unwrap_or(current.quantity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.quantity.is_none()
    }
}
