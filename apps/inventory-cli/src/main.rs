//! # Inventory Manager Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          inventory (binary)                             │
//! │                                                                         │
//! │  argv ──► clap ──► inventory_cli_lib::run ──► Session ──► SQLite       │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                     stdout: table or JSON, stderr: logs                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use clap::Parser;

use inventory_cli_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    inventory_cli_lib::run(cli).await
}
