//! Stock movement ledger models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::TransactionType;

/// Movement cause, mirroring the transaction type that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
    Check,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Check => "check",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementType::In),
            "out" => Some(MovementType::Out),
            "check" => Some(MovementType::Check),
            _ => None,
        }
    }
}

impl From<TransactionType> for MovementType {
    fn from(tx_type: TransactionType) -> Self {
        match tx_type {
            TransactionType::In => MovementType::In,
            TransactionType::Out => MovementType::Out,
            TransactionType::Check => MovementType::Check,
        }
    }
}

/// Immutable, append-only record of a stock quantity change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMovement {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub detail_transaction_id: Option<Uuid>,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    /// Signed quantity change applied to the item's stock
    pub quantity_delta: i32,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Aggregated movement window for one item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementSummary {
    pub total_in: i64,
    pub total_out: i64,
    pub net_movement: i64,
    pub stock_at_period_start: i64,
    pub stock_at_period_end: i64,
}

impl MovementSummary {
    /// Reconstruct the window boundaries from the current stock snapshot.
    ///
    /// `delta_after_end` is the sum of movement deltas recorded after the
    /// window; replaying it backwards from the current stock yields the
    /// stock at period end, and subtracting the window's net movement
    /// yields the stock at period start.
    pub fn from_window(
        current_stock: i64,
        total_in: i64,
        total_out: i64,
        delta_after_end: i64,
    ) -> Self {
        let net_movement = total_in - total_out;
        let stock_at_period_end = current_stock - delta_after_end;
        let stock_at_period_start = stock_at_period_end - net_movement;
        Self {
            total_in,
            total_out,
            net_movement,
            stock_at_period_start,
            stock_at_period_end,
        }
    }
}

/// Share of the opening stock consumed during the window; zero when the
/// window opened empty.
pub fn utilization_rate(total_out: i64, stock_at_period_start: i64) -> Decimal {
    if stock_at_period_start <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(total_out) / Decimal::from(stock_at_period_start)
}
