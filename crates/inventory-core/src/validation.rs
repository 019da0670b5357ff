//! # Validation Module
//!
//! Input validation for inventory forms, bulk imports and user accounts.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation shell                                           │
//! │  ├── Number inputs with min_value = 0                                  │
//! │  └── Category dropdown on the Add form                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands (Rust)                                              │
//! │  └── THIS MODULE: form rules, whole-file import checks                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY (item_code)                                           │
//! │  └── CHECK (quantity >= 0)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Category membership is only checked when an item is added (and, when
//! configured, on import). After entry the category is free text.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{InventoryItem, ItemChanges, NewInventoryItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Longest accepted category.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Longest accepted item code in an import file.
pub const MAX_ITEM_CODE_LEN: usize = 50;

/// Shortest accepted password for new accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item name.
///
/// An empty name is tolerated; only the length is bounded.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "item_name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a quantity: zero or more.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
            value: qty,
        });
    }
    Ok(())
}

/// Validates free-text category input (update form).
pub fn validate_category_text(category: &str) -> ValidationResult<()> {
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }
    Ok(())
}

/// Validates that a category is one of the configured options.
///
/// ## Example
/// ```rust
/// use inventory_core::validation::validate_category;
///
/// let catalog = vec!["Electronics".to_string(), "Other".to_string()];
/// assert!(validate_category("Other", &catalog).is_ok());
/// assert!(validate_category("other", &catalog).is_err());
/// ```
pub fn validate_category(category: &str, catalog: &[String]) -> ValidationResult<()> {
    if catalog.iter().any(|c| c == category) {
        return Ok(());
    }
    Err(ValidationError::NotAllowed {
        field: "category".to_string(),
        allowed: catalog.to_vec(),
    })
}

/// Validates an item code read from an import file.
pub fn validate_item_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item_code".to_string(),
        });
    }
    if code.len() > MAX_ITEM_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "item_code".to_string(),
            max: MAX_ITEM_CODE_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the Add-Item form.
pub fn validate_new_item(item: &NewInventoryItem, catalog: &[String]) -> ValidationResult<()> {
    validate_item_name(&item.item_name)?;
    validate_category(&item.category, catalog)?;
    validate_quantity(item.quantity)?;
    Ok(())
}

/// Validates the Update form.
pub fn validate_changes(changes: &ItemChanges) -> ValidationResult<()> {
    validate_item_name(&changes.item_name)?;
    validate_category_text(&changes.category)?;
    validate_quantity(changes.quantity)?;
    Ok(())
}

// =============================================================================
// Bulk Import
// =============================================================================

/// Validates every row of an import file before anything is deleted.
///
/// ## Rules
/// - item codes are non-empty and unique within the file
/// - quantities are non-negative
/// - when `catalog` is given, categories must be in it
///
/// The first offending row is reported by its 1-based position among the
/// data rows. Quoted fields may span lines, so this is not a file line.
pub fn validate_import_rows(
    rows: &[InventoryItem],
    catalog: Option<&[String]>,
) -> ValidationResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        let check = || -> ValidationResult<()> {
            validate_item_code(&row.item_code)?;
            validate_item_name(&row.item_name)?;
            validate_quantity(row.quantity)?;
            match catalog {
                Some(catalog) => validate_category(&row.category, catalog)?,
                None => validate_category_text(&row.category)?,
            }
            Ok(())
        };
        check().map_err(|e| e.at_row(row_number))?;

        if !seen.insert(row.item_code.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "item_code".to_string(),
                value: row.item_code.clone(),
            }
            .at_row(row_number));
        }
    }

    Ok(())
}

// =============================================================================
// Accounts
// =============================================================================

/// Validates a username for a new account.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    if username.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 64,
        });
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// Validates a password for a new account.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
