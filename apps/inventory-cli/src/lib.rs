//! # Inventory Manager CLI Library
//!
//! Everything behind the `inventory` binary: configuration, the session,
//! the commands and their rendering.
//!
//! ## Module Organization
//! ```text
//! inventory_cli_lib/
//! ├── lib.rs          ◄─── You are here (logging setup, dispatch)
//! ├── cli.rs          ◄─── clap definition
//! ├── config.rs       ◄─── AppConfig (file + INVENTORY_* environment)
//! ├── session.rs      ◄─── Session { Database, identity, config }
//! ├── commands/
//! │   ├── mod.rs      ◄─── CommandOutcome / CommandResult
//! │   ├── inventory.rs◄─── list, add, update, delete, dashboard
//! │   ├── transfer.rs ◄─── CSV export/restore, PDF report
//! │   ├── audit.rs    ◄─── deletion history, update log
//! │   └── users.rs    ◄─── account creation
//! ├── output.rs       ◄─── tables for humans
//! └── error.rs        ◄─── ApiError returned by every command
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

use std::io::Write;

use anyhow::{anyhow, Context};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inventory_core::InventoryFilter;

use cli::{AuditCommand, Cli, Command, ExportCommand, ImportCommand, ItemsCommand, UsersCommand};
use commands::CommandResult;
use config::AppConfig;
use error::ApiError;
use output::Render;
use session::Session;

/// Runs one invocation.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load configuration (file, then INVENTORY_* overrides)              │
/// │  2. Initialise logging (RUST_LOG, else config.log_filter)              │
/// │  3. Open the session; a dead database stops here                       │
/// │  4. Log in when credentials were given                                 │
/// │  5. Dispatch the command, print its outcome                            │
/// │  6. Log out (closes the database)                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Invalid configuration")?;
    if let Some(path) = &cli.database {
        config.database_path = Some(path.clone());
    }

    init_tracing(&config.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), "Inventory manager starting");

    let mut session = Session::open(config)
        .await
        .map_err(|e| report(cli.json, e))?;

    if let Some(username) = &cli.username {
        let password = cli
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("--password (or INVENTORY_PASSWORD) is required with --username"))?;
        let login = session.login(username, password).await.map(|_| ());
        if let Err(err) = login {
            session.logout().await;
            return Err(report(cli.json, err));
        }
    }

    let result = dispatch(&session, cli.command, cli.json).await;
    session.logout().await;
    result
}

async fn dispatch(session: &Session, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Users(UsersCommand::Add {
            username,
            new_password,
            display_name,
            role,
        }) => emit(
            json,
            commands::users::create_user(
                session,
                &username,
                &new_password,
                &display_name,
                role.into(),
            )
            .await,
        ),

        Command::Items(items) => dispatch_items(session, items, json).await,

        Command::Export(export) => {
            let (result, out) = match export {
                ExportCommand::Csv { filter, out } => (
                    commands::transfer::export_csv(session, &InventoryFilter::from(filter)).await,
                    out,
                ),
                ExportCommand::Pdf { filter, out } => (
                    commands::transfer::export_pdf(session, &InventoryFilter::from(filter)).await,
                    out,
                ),
            };
            let outcome = result.map_err(|e| report(json, e))?;
            std::fs::write(&out, &outcome.data.bytes)
                .with_context(|| format!("Cannot write {}", out.display()))?;
            info!(path = %out.display(), "Export written");
            emit(json, Ok(outcome))
        }

        Command::Import(import) => {
            let confirmation = import.confirmation();
            let ImportCommand::Csv { file, .. } = import;
            // An unconfirmed restore never reads the file.
            let bytes = if confirmation.is_confirmed() {
                std::fs::read(&file).with_context(|| format!("Cannot read {}", file.display()))?
            } else {
                Vec::new()
            };
            emit(
                json,
                commands::transfer::import_csv(session, &bytes, confirmation).await,
            )
        }

        Command::Audit(AuditCommand::History { code }) => emit(
            json,
            commands::audit::deletion_history(session, code.as_deref()).await,
        ),
        Command::Audit(AuditCommand::Logs { code }) => emit(
            json,
            commands::audit::update_log(session, code.as_deref()).await,
        ),
    }
}

async fn dispatch_items(session: &Session, command: ItemsCommand, json: bool) -> anyhow::Result<()> {
    use commands::inventory as items;

    match command {
        ItemsCommand::List(filter) => emit(
            json,
            items::list_items(session, &InventoryFilter::from(filter)).await,
        ),
        ItemsCommand::Add {
            name,
            category,
            quantity,
        } => emit(
            json,
            items::add_item(session, cli::new_item(name, category, quantity)).await,
        ),
        ItemsCommand::Update { code, patch } => {
            if patch.is_empty() {
                return Err(report(
                    json,
                    ApiError::validation("Nothing to update: give --name, --category or --quantity"),
                ));
            }
            session
                .require_admin("items update")
                .map_err(|e| report(json, e))?;
            let current = session
                .db()
                .inventory()
                .get(&code)
                .await
                .map_err(|e| report(json, e.into()))?
                .ok_or_else(|| report(json, ApiError::not_found("Item", &code)))?;
            emit(
                json,
                items::update_item(session, &code, patch.apply_to(&current)).await,
            )
        }
        ItemsCommand::Delete { code, yes } => {
            emit(json, items::delete_item(session, &code, yes).await)
        }
        ItemsCommand::NextCode => emit(json, items::next_code(session).await),
        ItemsCommand::Categories => emit(json, items::filter_categories(session).await),
        ItemsCommand::Summary(filter) => emit(
            json,
            items::summary(session, &InventoryFilter::from(filter)).await,
        ),
    }
}

/// Prints a command result to stdout.
fn emit<T: Serialize + Render>(json: bool, result: CommandResult<T>) -> anyhow::Result<()> {
    let outcome = result.map_err(|e| report(json, e))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &outcome)?;
        writeln!(out)?;
    } else {
        outcome.data.render(&mut out)?;
        writeln!(out, "{}", outcome.message)?;
    }
    Ok(())
}

/// Prints a failed command in JSON mode and turns it into the process error.
fn report(json: bool, err: ApiError) -> anyhow::Error {
    if json {
        if let Ok(text) = serde_json::to_string_pretty(&err) {
            println!("{}", text);
        }
    }
    anyhow::Error::new(err)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=inventory_db=trace` - Trace the database layer only
/// - Default: `log_filter` from the configuration
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
