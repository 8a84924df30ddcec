//! Raw-material item models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for raw-material item codes ("bahan baku")
pub const ITEM_CODE_PREFIX: &str = "BB";

/// A raw-material item tracked in inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// Sequential human-readable code (e.g., "BB-0001")
    pub code: String,
    pub name: String,
    pub unit_id: Uuid,
    pub category_id: Uuid,
    /// Quantity on hand; only ever mutated through the stock ledger
    pub stock_quantity: i32,
    pub min_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock level classification used by reports and dashboards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    LowStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::LowStock => "low_stock",
        }
    }

    /// Report classification: below the minimum threshold is low stock
    pub fn classify(current_stock: i32, min_stock: i32) -> Self {
        if current_stock < min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::Normal
        }
    }
}

/// Whether an item qualifies for the live low-stock alert list
/// (inclusive of the threshold itself)
pub fn is_low_stock(stock_quantity: i32, min_stock: i32) -> bool {
    stock_quantity <= min_stock
}

/// Format an item code from its numeric sequence (e.g., 1 -> "BB-0001")
pub fn format_item_code(sequence: i64) -> String {
    format!("{}-{:04}", ITEM_CODE_PREFIX, sequence)
}

/// Extract the numeric sequence from a dash-separated code.
/// Returns `None` for codes whose last segment is not a number.
pub fn parse_code_sequence(code: &str) -> Option<i64> {
    code.rsplit('-').next()?.parse().ok()
}
