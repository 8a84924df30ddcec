//! Transaction validator tests
//!
//! Exercises the per-type business rules that gate detail-line
//! creation and update:
//! - item existence against the catalog
//! - supplier requirement for IN
//! - stock sufficiency for OUT
//! - snapshot and arithmetic rules for CHECK
//! - note requirements
//! - receipt-update range and shortfall rules

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use shared::models::TransactionType;
use shared::validation::{
    editable_fields, validate_details, validate_receipt_update, DetailDraft, ItemCatalog,
    ItemSnapshot, Violation, QUANTITY_NOT_CHECKED,
};

fn catalog(entries: &[(Uuid, &str, i32)]) -> ItemCatalog {
    entries
        .iter()
        .map(|(id, name, stock)| {
            (
                *id,
                ItemSnapshot {
                    id: *id,
                    name: name.to_string(),
                    stock_quantity: *stock,
                },
            )
        })
        .collect()
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

fn fields_of(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.field.as_str()).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn unknown_item_is_reported_per_line() {
    let known = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let catalog = catalog(&[(known, "Gula", 10)]);

    let mut first = draft(known, 5);
    first.supplier_id = Some(Uuid::new_v4());
    let mut second = draft(unknown, 5);
    second.supplier_id = Some(Uuid::new_v4());

    let violations = validate_details(TransactionType::In, &[first, second], &catalog);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line_index, 1);
    assert_eq!(violations[0].field, "item_id");
}

#[test]
fn in_lines_require_supplier() {
    let item = Uuid::new_v4();
    let catalog = catalog(&[(item, "Gula", 10)]);

    let violations = validate_details(TransactionType::In, &[draft(item, 5)], &catalog);
    assert!(fields_of(&violations).contains(&"supplier_id"));

    let mut with_supplier = draft(item, 5);
    with_supplier.supplier_id = Some(Uuid::new_v4());
    let violations = validate_details(TransactionType::In, &[with_supplier], &catalog);
    assert!(violations.is_empty());
}

#[test]
fn out_quantity_may_not_exceed_stock() {
    let item = Uuid::new_v4();
    let catalog = catalog(&[(item, "Minyak", 50)]);

    let mut line = draft(item, 60);
    line.note = Some("lunch prep".to_string());
    let violations = validate_details(TransactionType::Out, &[line], &catalog);
    assert_eq!(fields_of(&violations), vec!["quantity"]);

    // exactly the available stock is allowed
    let mut line = draft(item, 50);
    line.note = Some("lunch prep".to_string());
    let violations = validate_details(TransactionType::Out, &[line], &catalog);
    assert!(violations.is_empty());
}

#[test]
fn out_and_check_require_note_nonblank_after_trim() {
    let item = Uuid::new_v4();
    let catalog = catalog(&[(item, "Minyak", 50)]);

    for note in [None, Some("".to_string()), Some("   ".to_string())] {
        let mut line = draft(item, 10);
        line.note = note;
        let violations = validate_details(TransactionType::Out, &[line], &catalog);
        assert!(fields_of(&violations).contains(&"note"));
    }
}

#[test]
fn check_quantity_must_match_stock_snapshot() {
    let item = Uuid::new_v4();
    let catalog = catalog(&[(item, "Beras", 40)]);

    let mut line = draft(item, 35);
    line.note = Some("monthly count".to_string());
    let violations = validate_details(TransactionType::Check, &[line], &catalog);
    assert!(fields_of(&violations).contains(&"quantity"));
}

#[test]
fn check_difference_arithmetic_is_enforced() {
    let item = Uuid::new_v4();
    let catalog = catalog(&[(item, "Beras", 40)]);

    // wrong difference
    let mut line = draft(item, 40);
    line.quantity_check = Some(35);
    line.quantity_difference = Some(5);
    line.note = Some("shrinkage".to_string());
    let violations = validate_details(TransactionType::Check, &[line], &catalog);
    assert_eq!(fields_of(&violations), vec!["quantity_difference"]);

    // missing difference while a check is recorded
    let mut line = draft(item, 40);
    line.quantity_check = Some(35);
    line.note = Some("shrinkage".to_string());
    let violations = validate_details(TransactionType::Check, &[line], &catalog);
    assert_eq!(fields_of(&violations), vec!["quantity_difference"]);

    // correct difference passes
    let mut line = draft(item, 40);
    line.quantity_check = Some(35);
    line.quantity_difference = Some(-5);
    line.note = Some("shrinkage".to_string());
    let violations = validate_details(TransactionType::Check, &[line], &catalog);
    assert!(violations.is_empty());
}

#[test]
fn violations_are_collected_not_fail_fast() {
    let catalog: ItemCatalog = HashMap::new();
    let unknown = Uuid::new_v4();

    // missing item, zero quantity, missing note: all three reported
    let line = draft(unknown, 0);
    let violations = validate_details(TransactionType::Out, &[line], &catalog);
    let fields = fields_of(&violations);
    assert!(fields.contains(&"item_id"));
    assert!(fields.contains(&"quantity"));
    assert!(fields.contains(&"note"));
}

#[test]
fn receipt_check_range_is_inclusive_of_sentinel() {
    // -1 = not yet checked, and the full quantity are both fine
    assert!(validate_receipt_update(10, QUANTITY_NOT_CHECKED, None).is_empty());
    assert!(validate_receipt_update(10, 10, None).is_empty());

    // outside the range on either side
    assert_eq!(
        fields_of(&validate_receipt_update(10, -2, None)),
        vec!["quantity_check"]
    );
    assert_eq!(
        fields_of(&validate_receipt_update(10, 11, None)),
        vec!["quantity_check"]
    );
}

#[test]
fn receipt_shortfall_requires_note() {
    // 7 of 10 usable units received -> note required
    let violations = validate_receipt_update(10, 7, None);
    assert_eq!(fields_of(&violations), vec!["note"]);

    let violations = validate_receipt_update(10, 7, Some("3 damaged on arrival"));
    assert!(violations.is_empty());

    // zero received is still a shortfall
    let violations = validate_receipt_update(10, 0, None);
    assert_eq!(fields_of(&violations), vec!["note"]);

    // full receipt needs no note
    assert!(validate_receipt_update(10, 10, None).is_empty());
}

#[test]
fn editable_fields_follow_the_type_table() {
    assert_eq!(
        editable_fields(TransactionType::In),
        &["quantity_check", "note", "expiry_date"]
    );
    assert_eq!(editable_fields(TransactionType::Out), &["note"]);
    assert!(editable_fields(TransactionType::Check).is_empty());
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The recorded difference passes validation iff it equals check - system
    #[test]
    fn prop_check_difference_validates_exactly(
        stock in 0i32..10_000,
        check in 0i32..10_000,
        claimed in -10_000i32..10_000,
    ) {
        let item = Uuid::new_v4();
        // keep the snapshot rule satisfied so only arithmetic is under test
        let quantity = stock.max(1);
        let catalog = catalog(&[(item, "Beras", quantity)]);

        let mut line = draft(item, quantity);
        line.quantity_check = Some(check);
        line.quantity_difference = Some(claimed);
        line.note = Some("count".to_string());

        let violations = validate_details(TransactionType::Check, &[line.clone()], &catalog);
        let arithmetic_ok = claimed == check - line.quantity;
        prop_assert_eq!(violations.is_empty(), arithmetic_ok);
    }

    /// OUT never validates when the quantity exceeds stock
    #[test]
    fn prop_out_rejects_overdraw(stock in 0i32..1_000, quantity in 1i32..2_000) {
        let item = Uuid::new_v4();
        let catalog = catalog(&[(item, "Minyak", stock)]);

        let mut line = draft(item, quantity);
        line.note = Some("service".to_string());
        let violations = validate_details(TransactionType::Out, &[line], &catalog);

        if quantity > stock {
            prop_assert!(violations.iter().any(|v| v.field == "quantity"));
        } else {
            prop_assert!(violations.is_empty());
        }
    }

    /// Receipt updates accept exactly the inclusive range [-1, quantity]
    #[test]
    fn prop_receipt_range(quantity in 1i32..1_000, check in -10i32..1_010) {
        let violations = validate_receipt_update(quantity, check, Some("noted"));
        let in_range = (QUANTITY_NOT_CHECKED..=quantity).contains(&check);
        prop_assert_eq!(!violations.iter().any(|v| v.field == "quantity_check"), in_range);
    }
}
