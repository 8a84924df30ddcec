//! Validation rules for transaction detail lines
//!
//! Pure functions shared between the backend and the WASM module so the
//! same business rules gate forms in the browser and requests on the
//! server. Violations are collected, not fail-fast, so a caller gets every
//! problem on every line in one pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::TransactionType;

/// Sentinel for "physical check not performed yet" on IN receipts
pub const QUANTITY_NOT_CHECKED: i32 = -1;

/// Item view the validator checks proposed lines against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: Uuid,
    pub name: String,
    pub stock_quantity: i32,
}

/// Catalog of items referenced by the proposed detail lines
pub type ItemCatalog = HashMap<Uuid, ItemSnapshot>;

/// A proposed detail line, before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDraft {
    pub item_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub quantity: i32,
    pub quantity_check: Option<i32>,
    pub quantity_difference: Option<i32>,
    pub note: Option<String>,
    pub expiry_date: Option<chrono::NaiveDate>,
}

/// One business-rule violation, keyed by line index and field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub line_index: usize,
    pub field: String,
    pub message: String,
    pub message_id: String,
}

impl Violation {
    fn new(
        line_index: usize,
        field: &str,
        message: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            line_index,
            field: field.to_string(),
            message: message.into(),
            message_id: message_id.into(),
        }
    }
}

fn note_is_blank(note: Option<&str>) -> bool {
    note.map_or(true, |n| n.trim().is_empty())
}

/// Validate proposed detail lines for a transaction of the given type.
///
/// Returns every violation found; an empty vector means the lines are
/// valid. No side effects.
pub fn validate_details(
    tx_type: TransactionType,
    details: &[DetailDraft],
    catalog: &ItemCatalog,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (index, detail) in details.iter().enumerate() {
        let item = catalog.get(&detail.item_id);

        if item.is_none() {
            violations.push(Violation::new(
                index,
                "item_id",
                "Referenced item does not exist",
                "Bahan baku yang dirujuk tidak ditemukan",
            ));
        }

        if detail.quantity < 1 {
            violations.push(Violation::new(
                index,
                "quantity",
                "Quantity must be at least 1",
                "Jumlah minimal 1",
            ));
        }

        match tx_type {
            TransactionType::In => {
                if detail.supplier_id.is_none() {
                    violations.push(Violation::new(
                        index,
                        "supplier_id",
                        "Supplier is required for incoming transactions",
                        "Supplier wajib diisi untuk transaksi masuk",
                    ));
                }
            }
            TransactionType::Out => {
                if let Some(item) = item {
                    if detail.quantity > item.stock_quantity {
                        violations.push(Violation::new(
                            index,
                            "quantity",
                            format!(
                                "Quantity exceeds current stock ({})",
                                item.stock_quantity
                            ),
                            format!(
                                "Jumlah melebihi stok saat ini ({})",
                                item.stock_quantity
                            ),
                        ));
                    }
                }
            }
            TransactionType::Check => {
                // the system quantity records the stock snapshot at check time
                if let Some(item) = item {
                    if detail.quantity != item.stock_quantity {
                        violations.push(Violation::new(
                            index,
                            "quantity",
                            format!(
                                "System quantity must equal current stock ({})",
                                item.stock_quantity
                            ),
                            format!(
                                "Jumlah sistem harus sama dengan stok saat ini ({})",
                                item.stock_quantity
                            ),
                        ));
                    }
                }
                violations.extend(check_arithmetic(index, detail));
            }
        }

        if matches!(tx_type, TransactionType::Out | TransactionType::Check)
            && note_is_blank(detail.note.as_deref())
        {
            violations.push(Violation::new(
                index,
                "note",
                "Note is required",
                "Catatan wajib diisi",
            ));
        }
    }

    violations
}

/// quantity_difference must equal quantity_check - quantity whenever a
/// check quantity is recorded. This is an enforced arithmetic constraint,
/// not a convenience field.
fn check_arithmetic(index: usize, detail: &DetailDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    if let Some(check) = detail.quantity_check {
        let expected = check - detail.quantity;
        match detail.quantity_difference {
            Some(diff) if diff == expected => {}
            _ => violations.push(Violation::new(
                index,
                "quantity_difference",
                format!("Quantity difference must equal {}", expected),
                format!("Selisih jumlah harus sama dengan {}", expected),
            )),
        }
    }
    violations
}

/// Validate a receipt update on an IN detail line.
///
/// `quantity_check` must lie in `[-1, quantity]`; -1 means the physical
/// check has not happened yet. A shortfall (fewer usable units received
/// than requested) requires a note explaining it.
pub fn validate_receipt_update(
    quantity: i32,
    quantity_check: i32,
    note: Option<&str>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if quantity_check < QUANTITY_NOT_CHECKED || quantity_check > quantity {
        violations.push(Violation::new(
            0,
            "quantity_check",
            format!("Checked quantity must be between -1 and {}", quantity),
            format!("Jumlah terperiksa harus antara -1 dan {}", quantity),
        ));
    }

    let shortfall = quantity_check >= 0 && quantity_check < quantity;
    if shortfall && note_is_blank(note) {
        violations.push(Violation::new(
            0,
            "note",
            "Note is required when received quantity falls short",
            "Catatan wajib diisi saat jumlah diterima kurang",
        ));
    }

    violations
}

/// Fields a caller may edit on a detail line, per transaction type.
///
/// CHECK details are system-computed and never hand-edited.
pub fn editable_fields(tx_type: TransactionType) -> &'static [&'static str] {
    match tx_type {
        TransactionType::In => &["quantity_check", "note", "expiry_date"],
        TransactionType::Out => &["note"],
        TransactionType::Check => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    fn catalog_with(stock: i32) -> (Uuid, ItemCatalog) {
        let id = Uuid::new_v4();
        let mut catalog = HashMap::new();
        catalog.insert(
            id,
            ItemSnapshot {
                id,
                name: "Beras".to_string(),
                stock_quantity: stock,
            },
        );
        (id, catalog)
    }

    fn draft(item_id: Uuid, quantity: i32) -> DetailDraft {
        DetailDraft {
            item_id,
            supplier_id: None,
            quantity,
            quantity_check: None,
            quantity_difference: None,
            note: None,
            expiry_date: None,
        }
    }

    #[test]
    fn in_requires_supplier() {
        let (item_id, catalog) = catalog_with(10);
        let violations = validate_details(TransactionType::In, &[draft(item_id, 5)], &catalog);
        assert!(violations.iter().any(|v| v.field == "supplier_id"));
    }

    #[test]
    fn out_rejects_overdraw_and_missing_note() {
        let (item_id, catalog) = catalog_with(50);
        let violations = validate_details(TransactionType::Out, &[draft(item_id, 60)], &catalog);
        assert!(violations.iter().any(|v| v.field == "quantity"));
        assert!(violations.iter().any(|v| v.field == "note"));
    }

    #[test]
    fn check_difference_must_match() {
        let (item_id, catalog) = catalog_with(40);
        let mut line = draft(item_id, 40);
        line.quantity_check = Some(35);
        line.quantity_difference = Some(-4);
        line.note = Some("shrinkage".to_string());
        let violations = validate_details(TransactionType::Check, &[line], &catalog);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "quantity_difference");
    }

    #[test]
    fn receipt_sentinel_is_valid() {
        assert!(validate_receipt_update(10, QUANTITY_NOT_CHECKED, None).is_empty());
        assert!(!validate_receipt_update(10, -2, None).is_empty());
        assert!(!validate_receipt_update(10, 11, None).is_empty());
    }
}
