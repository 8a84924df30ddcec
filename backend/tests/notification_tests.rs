//! Notification composition tests
//!
//! The core groups purchased lines by supplier and composes bilingual
//! messages; delivery is external and not tested here.

use uuid::Uuid;

use shared::models::{
    compose_low_stock_message, compose_purchase_order_message, group_by_supplier,
    PurchaseOrderLine,
};

fn line(supplier_id: Uuid, supplier: &str, item: &str, quantity: i32, unit: &str) -> PurchaseOrderLine {
    PurchaseOrderLine {
        supplier_id,
        supplier_name: supplier.to_string(),
        item_name: item.to_string(),
        quantity,
        unit_name: unit.to_string(),
    }
}

#[test]
fn grouping_collects_lines_per_supplier() {
    let tani = Uuid::new_v4();
    let laut = Uuid::new_v4();

    let lines = vec![
        line(tani, "CV Tani Jaya", "Beras", 25, "kg"),
        line(laut, "UD Laut Segar", "Udang", 5, "kg"),
        line(tani, "CV Tani Jaya", "Gula", 10, "kg"),
    ];

    let orders = group_by_supplier(&lines);
    assert_eq!(orders.len(), 2);

    // first-seen supplier order is preserved
    assert_eq!(orders[0].supplier_name, "CV Tani Jaya");
    assert_eq!(orders[0].lines.len(), 2);
    assert_eq!(orders[1].supplier_name, "UD Laut Segar");
    assert_eq!(orders[1].lines.len(), 1);
}

#[test]
fn grouping_empty_input_yields_no_orders() {
    assert!(group_by_supplier(&[]).is_empty());
}

#[test]
fn purchase_order_message_lists_every_line() {
    let tani = Uuid::new_v4();
    let lines = vec![
        line(tani, "CV Tani Jaya", "Beras", 25, "kg"),
        line(tani, "CV Tani Jaya", "Gula", 10, "kg"),
    ];
    let orders = group_by_supplier(&lines);

    let (message_en, message_id) = compose_purchase_order_message("TRX-IN-0003", &orders[0]);

    assert_eq!(
        message_en,
        "Purchase order TRX-IN-0003 for CV Tani Jaya: 25 kg Beras, 10 kg Gula"
    );
    assert_eq!(
        message_id,
        "Pesanan pembelian TRX-IN-0003 untuk CV Tani Jaya: 25 kg Beras, 10 kg Gula"
    );
}

#[test]
fn low_stock_message_reports_remaining_and_minimum() {
    let (message_en, message_id) = compose_low_stock_message("Minyak Goreng", 3, 10);

    assert_eq!(
        message_en,
        "Stock of Minyak Goreng is low: 3 remaining (minimum 10)"
    );
    assert_eq!(
        message_id,
        "Stok Minyak Goreng menipis: tersisa 3 (minimum 10)"
    );
}
