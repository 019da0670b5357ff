//! # Item Code Allocation
//!
//! Item codes are `A` followed by a 3-digit, zero-padded sequence number.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Next Code From Current Maximum                      │
//! │                                                                         │
//! │   max code in table     next code                                       │
//! │   ─────────────────     ─────────                                       │
//! │   (none)            ──► A001                                            │
//! │   A007              ──► A008                                            │
//! │   A099              ──► A100                                            │
//! │   A999              ──► CodeSpaceExhausted (format stays 4 chars wide)  │
//! │   "A"/"Axyz"        ──► MalformedItemCode                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only does the arithmetic. Making "read max, then insert"
//! atomic is the database layer's job (see `InventoryRepository::add_item`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Prefix every allocated code starts with.
pub const ITEM_CODE_PREFIX: char = 'A';

/// Width of the numeric part.
pub const ITEM_CODE_DIGITS: usize = 3;

/// Largest sequence number that still fits the fixed width.
pub const MAX_ITEM_SEQUENCE: u32 = 999;

/// An allocated item code such as `A042`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    /// Renders the code for a sequence number.
    ///
    /// Returns `CodeSpaceExhausted` when `seq` needs more than three digits.
    pub fn from_sequence(seq: u32) -> CoreResult<Self> {
        if seq > MAX_ITEM_SEQUENCE {
            return Err(CoreError::CodeSpaceExhausted {
                last: format!("{}{:03}", ITEM_CODE_PREFIX, MAX_ITEM_SEQUENCE),
            });
        }
        Ok(ItemCode(format!("{}{:03}", ITEM_CODE_PREFIX, seq)))
    }

    /// The numeric part of the code.
    pub fn sequence(&self) -> u32 {
        // Constructed only through from_sequence, so the suffix is digits.
        self.0[1..].parse().unwrap_or(0)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemCode> for String {
    fn from(code: ItemCode) -> Self {
        code.0
    }
}

/// Parses the numeric suffix of an existing code (everything after the first
/// character).
pub fn parse_sequence(code: &str) -> CoreResult<u32> {
    let mut chars = code.chars();
    chars.next();
    let suffix = chars.as_str();

    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::MalformedItemCode(code.to_string()));
    }

    suffix
        .parse::<u32>()
        .map_err(|_| CoreError::MalformedItemCode(code.to_string()))
}

/// Computes the code that follows the current maximum.
///
/// ## Arguments
/// * `max_code` - The greatest code currently stored, if any
pub fn next_item_code(max_code: Option<&str>) -> CoreResult<ItemCode> {
    match max_code {
        None => ItemCode::from_sequence(1),
        Some(code) => {
            let seq = parse_sequence(code)?;
            ItemCode::from_sequence(seq.saturating_add(1))
        }
    }
}
