//! WebAssembly module for the Restaurant Inventory Management Platform
//!
//! Provides client-side computation for:
//! - Detail-line validation (same rules as the server)
//! - Check-quantity arithmetic
//! - Low-stock classification
//! - Code formatting

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate proposed detail lines offline.
///
/// `details_json` is an array of detail drafts, `catalog_json` an array of
/// item snapshots. Returns the violations as a JSON array; an empty array
/// means the lines are valid.
#[wasm_bindgen]
pub fn validate_detail_lines(
    transaction_type: &str,
    details_json: &str,
    catalog_json: &str,
) -> Result<String, JsValue> {
    let tx_type = TransactionType::parse(transaction_type)
        .ok_or_else(|| JsValue::from_str("Unknown transaction type"))?;

    let details: Vec<DetailDraft> = serde_json::from_str(details_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid details JSON: {}", e)))?;

    let snapshots: Vec<ItemSnapshot> = serde_json::from_str(catalog_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid catalog JSON: {}", e)))?;
    let catalog: ItemCatalog = snapshots.into_iter().map(|s| (s.id, s)).collect();

    let violations = validate_details(tx_type, &details, &catalog);
    serde_json::to_string(&violations)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Validate a receipt update on an IN detail line
#[wasm_bindgen]
pub fn validate_receipt(
    quantity: i32,
    quantity_check: i32,
    note: Option<String>,
) -> Result<String, JsValue> {
    let violations = validate_receipt_update(quantity, quantity_check, note.as_deref());
    serde_json::to_string(&violations)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Difference between the checked and system quantity
#[wasm_bindgen]
pub fn compute_quantity_difference(quantity_check: i32, quantity: i32) -> i32 {
    quantity_check - quantity
}

/// Whether an item belongs on the low-stock alert list
#[wasm_bindgen]
pub fn item_is_low_stock(stock_quantity: i32, min_stock: i32) -> bool {
    is_low_stock(stock_quantity, min_stock)
}

/// Format an item code from its sequence number
#[wasm_bindgen]
pub fn item_code(sequence: i64) -> String {
    format_item_code(sequence)
}

/// Format a transaction code from its type and sequence number
#[wasm_bindgen]
pub fn transaction_code(transaction_type: &str, sequence: i64) -> Result<String, JsValue> {
    let tx_type = TransactionType::parse(transaction_type)
        .ok_or_else(|| JsValue::from_str("Unknown transaction type"))?;
    Ok(format_transaction_code(tx_type, sequence))
}

/// Fields a form may let the user edit for the given transaction type
#[wasm_bindgen]
pub fn detail_editable_fields(transaction_type: &str) -> Result<String, JsValue> {
    let tx_type = TransactionType::parse(transaction_type)
        .ok_or_else(|| JsValue::from_str("Unknown transaction type"))?;
    serde_json::to_string(editable_fields(tx_type))
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_code_formatting() {
        assert_eq!(item_code(1), "BB-0001");
        assert_eq!(item_code(42), "BB-0042");
        assert_eq!(item_code(10000), "BB-10000");
    }

    #[test]
    fn test_transaction_code_formatting() {
        assert_eq!(transaction_code("in", 1).unwrap(), "TRX-IN-0001");
        assert_eq!(transaction_code("check", 7).unwrap(), "TRX-CHECK-0007");
    }

    #[test]
    fn test_quantity_difference() {
        assert_eq!(compute_quantity_difference(35, 40), -5);
        assert_eq!(compute_quantity_difference(40, 40), 0);
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(item_is_low_stock(10, 10));
        assert!(item_is_low_stock(9, 10));
        assert!(!item_is_low_stock(11, 10));
    }

    #[test]
    fn test_validate_detail_lines_reports_missing_item() {
        let details = r#"[{
            "item_id": "00000000-0000-0000-0000-000000000001",
            "supplier_id": null,
            "quantity": 5,
            "quantity_check": null,
            "quantity_difference": null,
            "note": "dinner service",
            "expiry_date": null
        }]"#;
        let violations = validate_detail_lines("out", details, "[]").unwrap();
        assert!(violations.contains("item_id"));
    }
}
