//! # Seed Data Generator
//!
//! Populates a database with an admin account and sample inventory for
//! development.
//!
//! ## Usage
//! ```bash
//! # 40 items (default) and admin/admin123
//! cargo run -p inventory-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p inventory-db --bin seed -- --count 120 --db ./data/inventory.db
//!
//! # Custom admin credentials
//! cargo run -p inventory-db --bin seed -- --admin-user boss --admin-password hunter22
//! ```
//!
//! ## Generated Items
//! Items cycle through the default categories. Quantities spread from 0 to
//! 60 so that roughly a quarter of the rows are low stock.

use std::env;

use anyhow::Context;
use inventory_core::{NewInventoryItem, UserRole, DEFAULT_CATEGORIES};
use inventory_db::{Database, DbConfig};

/// Sample names per default category, same order as `DEFAULT_CATEGORIES`.
const NAMES: &[&[&str]] = &[
    &[
        "Laptop", "Monitor", "Keyboard", "Mouse", "USB Hub", "Webcam", "Headset", "Router",
        "Printer", "Docking Station",
    ],
    &[
        "Office Chair", "Standing Desk", "Filing Cabinet", "Bookshelf", "Meeting Table",
        "Drawer Unit", "Coat Rack", "Whiteboard",
    ],
    &[
        "Printer Paper", "Toner Cartridge", "Sticky Notes", "Ballpoint Pens", "Staples",
        "Batteries AA", "Envelopes", "Coffee Beans",
    ],
    &["First Aid Kit", "Fire Extinguisher", "Extension Cord", "Umbrella"],
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./inventory_dev.db");
    let mut admin_user = String::from("admin");
    let mut admin_password = String::from("admin123");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-user" => {
                if i + 1 < args.len() {
                    admin_user = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-password" => {
                if i + 1 < args.len() {
                    admin_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inventory Manager Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>            Number of items to generate (default: 40, max: 999)");
                println!("  -d, --db <PATH>            Database file path (default: ./inventory_dev.db)");
                println!("      --admin-user <NAME>    Admin username (default: admin)");
                println!("      --admin-password <PW>  Admin password (default: admin123)");
                println!("  -h, --help                 Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inventory Manager Seed Data Generator");
    println!("=======================================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {}", db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Admin account
    if db.users().find_by_username(&admin_user).await?.is_some() {
        println!("⚠ User '{}' already exists, leaving it alone", admin_user);
    } else {
        db.users()
            .create(&admin_user, &admin_password, "Administrator", UserRole::Admin)
            .await
            .context("creating admin account")?;
        println!("✓ Created admin account '{}'", admin_user);
    }

    // Inventory
    let existing = db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count.min(999) {
        let item = generate_item(seed);
        match db.inventory().add_item(&item).await {
            Ok(_) => generated += 1,
            Err(e) => {
                eprintln!("Failed to add {}: {}", item.item_name, e);
                continue;
            }
        }
    }

    let elapsed = start.elapsed();
    let low = db
        .inventory()
        .low_stock(&inventory_core::InventoryFilter::all())
        .await?;

    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);
    println!("  Low stock: {}", low.len());
    println!("  Next code: {}", db.inventory().peek_next_code().await?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates the `seed`-th sample item.
fn generate_item(seed: usize) -> NewInventoryItem {
    let category_idx = seed % DEFAULT_CATEGORIES.len();
    let names = NAMES[category_idx];
    let base = names[(seed / DEFAULT_CATEGORIES.len()) % names.len()];
    let batch = seed / (DEFAULT_CATEGORIES.len() * names.len());

    let item_name = if batch == 0 {
        base.to_string()
    } else {
        format!("{} #{}", base, batch + 1)
    };

    NewInventoryItem {
        item_name,
        category: DEFAULT_CATEGORIES[category_idx].to_string(),
        quantity: ((seed * 37) % 61) as i64,
    }
}
