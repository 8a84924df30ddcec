//! Notification models and pure message composition
//!
//! Delivery itself is an external concern; the core only composes the
//! bilingual messages and groups purchase lines by supplier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification kinds produced by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PurchaseOrder,
    LowStock,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::PurchaseOrder => "purchase_order",
            NotificationType::LowStock => "low_stock",
        }
    }
}

/// Delivery status of a queued notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
    Read,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
            NotificationStatus::Read => "read",
        }
    }
}

/// One purchased line destined for a supplier notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub item_name: String,
    pub quantity: i32,
    pub unit_name: String,
}

/// Purchase lines grouped for one supplier
#[derive(Debug, Clone)]
pub struct SupplierOrder {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub lines: Vec<PurchaseOrderLine>,
}

/// Group purchase lines by supplier, preserving first-seen supplier order
pub fn group_by_supplier(lines: &[PurchaseOrderLine]) -> Vec<SupplierOrder> {
    let mut orders: Vec<SupplierOrder> = Vec::new();
    for line in lines {
        match orders.iter_mut().find(|o| o.supplier_id == line.supplier_id) {
            Some(order) => order.lines.push(line.clone()),
            None => orders.push(SupplierOrder {
                supplier_id: line.supplier_id,
                supplier_name: line.supplier_name.clone(),
                lines: vec![line.clone()],
            }),
        }
    }
    orders
}

/// Compose the (English, Indonesian) purchase-order message for one supplier
pub fn compose_purchase_order_message(
    transaction_code: &str,
    order: &SupplierOrder,
) -> (String, String) {
    let item_list = order
        .lines
        .iter()
        .map(|l| format!("{} {} {}", l.quantity, l.unit_name, l.item_name))
        .collect::<Vec<_>>()
        .join(", ");

    let message_en = format!(
        "Purchase order {} for {}: {}",
        transaction_code, order.supplier_name, item_list
    );
    let message_id = format!(
        "Pesanan pembelian {} untuk {}: {}",
        transaction_code, order.supplier_name, item_list
    );
    (message_en, message_id)
}

/// Compose the (English, Indonesian) low-stock message for an item
pub fn compose_low_stock_message(
    item_name: &str,
    stock_quantity: i32,
    min_stock: i32,
) -> (String, String) {
    let message_en = format!(
        "Stock of {} is low: {} remaining (minimum {})",
        item_name, stock_quantity, min_stock
    );
    let message_id = format!(
        "Stok {} menipis: tersisa {} (minimum {})",
        item_name, stock_quantity, min_stock
    );
    (message_en, message_id)
}
