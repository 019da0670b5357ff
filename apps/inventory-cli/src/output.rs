//! Human-readable rendering of command results.
//!
//! `--json` bypasses all of this and prints the serialized outcome.

use std::io::{self, Write};

use inventory_core::{CategoryCount, Identity, InventoryHistoryEntry, InventoryLogEntry};

use crate::commands::inventory::{InventorySummary, ItemDto};
use crate::commands::transfer::{ExportFile, ImportReport};

const CODE_W: usize = 10;
const NAME_W: usize = 28;
const CATEGORY_W: usize = 16;
const QTY_W: usize = 8;

/// Things that know how to print themselves as a table or a line.
pub trait Render {
    fn render(&self, out: &mut dyn Write) -> io::Result<()>;
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(2)).collect();
    clipped.push_str("..");
    clipped
}

fn item_header(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<CODE_W$} {:<NAME_W$} {:<CATEGORY_W$} {:>QTY_W$}",
        "Item Code", "Item Name", "Category", "Quantity"
    )?;
    writeln!(out, "{}", "-".repeat(CODE_W + NAME_W + CATEGORY_W + QTY_W + 3))
}

impl Render for ItemDto {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{:<CODE_W$} {:<NAME_W$} {:<CATEGORY_W$} {:>QTY_W$}{}",
            self.item_code,
            clip(&self.item_name, NAME_W),
            clip(&self.category, CATEGORY_W),
            self.quantity,
            if self.low_stock { "  LOW" } else { "" }
        )
    }
}

impl Render for Vec<ItemDto> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        item_header(out)?;
        for item in self {
            item.render(out)?;
        }
        Ok(())
    }
}

impl Render for InventorySummary {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Total items:   {}", self.total_items)?;
        writeln!(out, "Shown:         {}", self.shown_items)?;
        writeln!(
            out,
            "Low stock (< {}): {}",
            self.low_stock_threshold,
            self.low_stock.len()
        )?;
        self.low_stock.render(out)?;
        if !self.category_counts.is_empty() {
            writeln!(out)?;
            self.category_counts.render(out)?;
        }
        Ok(())
    }
}

impl Render for Vec<CategoryCount> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let widest = self.iter().map(|c| c.count).max().unwrap_or(0).max(1);
        for entry in self {
            let bar = (entry.count * 30 / widest) as usize;
            writeln!(
                out,
                "{:<CATEGORY_W$} {:>5} {}",
                clip(&entry.category, CATEGORY_W),
                entry.count,
                "#".repeat(bar)
            )?;
        }
        Ok(())
    }
}

impl Render for Vec<InventoryHistoryEntry> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        for entry in self {
            writeln!(
                out,
                "{} {} {:<CODE_W$} {:<NAME_W$} {:<CATEGORY_W$} {:>QTY_W$}",
                entry.action_time.format("%Y-%m-%d %H:%M:%S"),
                entry.action,
                entry.item_code,
                clip(&entry.item_name, NAME_W),
                clip(&entry.category, CATEGORY_W),
                entry.quantity
            )?;
        }
        Ok(())
    }
}

fn change<T: std::fmt::Display>(old: &Option<T>, new: &Option<T>) -> Option<String> {
    match (old, new) {
        (None, None) => None,
        (old, new) => Some(format!(
            "{} -> {}",
            old.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            new.as_ref().map(|v| v.to_string()).unwrap_or_default()
        )),
    }
}

impl Render for Vec<InventoryLogEntry> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        for entry in self {
            let changes: Vec<String> = [
                change(&entry.old_name, &entry.new_name).map(|c| format!("name {}", c)),
                change(&entry.old_category, &entry.new_category).map(|c| format!("category {}", c)),
                change(&entry.old_qty, &entry.new_qty).map(|c| format!("qty {}", c)),
            ]
            .into_iter()
            .flatten()
            .collect();

            writeln!(
                out,
                "{} {} {} by {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.action,
                entry.item_code,
                entry.user.as_deref().unwrap_or("-"),
                changes.join(", ")
            )?;
        }
        Ok(())
    }
}

impl Render for Vec<String> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        for line in self {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

// The status message already says everything about these.
impl Render for Identity {
    fn render(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

impl Render for InventoryHistoryEntry {
    fn render(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

impl Render for String {
    fn render(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

impl Render for ImportReport {
    fn render(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

impl Render for ExportFile {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} ({}, {} bytes)", self.file_name, self.mime, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(value: &dyn Render) -> String {
        let mut buf = Vec::new();
        value.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_item_table_flags_low_stock() {
        let items = vec![
            ItemDto {
                item_code: "A001".to_string(),
                item_name: "Laptop".to_string(),
                category: "Electronics".to_string(),
                quantity: 4,
                low_stock: true,
            },
            ItemDto {
                item_code: "A002".to_string(),
                item_name: "Desk".to_string(),
                category: "Furniture".to_string(),
                quantity: 15,
                low_stock: false,
            },
        ];
        let text = rendered(&items);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Item Code"));
        assert!(lines[2].ends_with("LOW"));
        assert!(!lines[3].ends_with("LOW"));
    }

    #[test]
    fn test_long_names_are_clipped() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a very long item name", 10), "a very l..");
    }

    #[test]
    fn test_empty_list_prints_nothing() {
        assert_eq!(rendered(&Vec::<ItemDto>::new()), "");
    }
}
