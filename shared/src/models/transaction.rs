//! Transaction and detail-line models with the status state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for transaction codes
pub const TRANSACTION_CODE_PREFIX: &str = "TRX";

/// Stock-affecting transaction types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Incoming stock (purchase receipt)
    In,
    /// Outgoing stock (kitchen usage)
    Out,
    /// Physical stock reconciliation
    Check,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "in",
            TransactionType::Out => "out",
            TransactionType::Check => "check",
        }
    }

    /// Uppercase segment used inside transaction codes (e.g., "TRX-IN-0001")
    pub fn code_segment(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
            TransactionType::Check => "CHECK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(TransactionType::In),
            "out" => Some(TransactionType::Out),
            "check" => Some(TransactionType::Check),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status shared by transactions and their detail lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Ordered,
    Received,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Ordered => "ordered",
            TransactionStatus::Received => "received",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "ordered" => Some(TransactionStatus::Ordered),
            "received" => Some(TransactionStatus::Received),
            "completed" => Some(TransactionStatus::Completed),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal states admit no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Cancelled
        )
    }

    /// Progress rank along the monotonic chain; cancelled has no rank
    fn rank(&self) -> Option<u8> {
        match self {
            TransactionStatus::Pending => Some(0),
            TransactionStatus::Ordered => Some(1),
            TransactionStatus::Received => Some(2),
            TransactionStatus::Completed => Some(3),
            TransactionStatus::Cancelled => None,
        }
    }

    /// Whether a transition from `self` to `next` is allowed for the given
    /// transaction type. IN transactions walk the full purchasing chain;
    /// OUT and CHECK have no order/receive phase and complete directly.
    /// Cancellation is allowed from any non-terminal state.
    pub fn can_transition_to(&self, next: TransactionStatus, tx_type: TransactionType) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == TransactionStatus::Cancelled {
            return true;
        }
        match tx_type {
            TransactionType::In => matches!(
                (self, next),
                (TransactionStatus::Pending, TransactionStatus::Ordered)
                    | (TransactionStatus::Ordered, TransactionStatus::Received)
                    | (TransactionStatus::Received, TransactionStatus::Completed)
            ),
            TransactionType::Out | TransactionType::Check => matches!(
                (self, next),
                (TransactionStatus::Pending, TransactionStatus::Completed)
            ),
        }
    }

    /// Whether entering `self` posts a stock movement for the given type.
    /// Posting is still guarded by the detail's `stock_posted_at` so the
    /// movement is recorded exactly once.
    pub fn triggers_stock_posting(&self, tx_type: TransactionType) -> bool {
        match tx_type {
            TransactionType::In => matches!(
                self,
                TransactionStatus::Received | TransactionStatus::Completed
            ),
            TransactionType::Out | TransactionType::Check => {
                matches!(self, TransactionStatus::Completed)
            }
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stock-affecting transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Sequential code scoped by type (e.g., "TRX-IN-0001")
    pub code: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub transaction_date: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One item+quantity entry within a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailTransaction {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub item_id: Uuid,
    /// Required when the parent transaction type is IN
    pub supplier_id: Option<Uuid>,
    /// System/requested quantity
    pub quantity: i32,
    /// Physically counted or received quantity; -1 means not yet checked
    pub quantity_check: Option<i32>,
    /// Always `quantity_check - quantity` when both are present
    pub quantity_difference: Option<i32>,
    pub note: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    /// Set exactly once, when the stock movement for this line is posted
    pub stock_posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Format a transaction code from its type and numeric sequence
/// (e.g., (In, 3) -> "TRX-IN-0003")
pub fn format_transaction_code(tx_type: TransactionType, sequence: i64) -> String {
    format!(
        "{}-{}-{:04}",
        TRANSACTION_CODE_PREFIX,
        tx_type.code_segment(),
        sequence
    )
}

/// The quantity a posted movement uses: the checked quantity when one was
/// recorded, the requested quantity otherwise. The -1 sentinel counts as
/// "not yet checked".
pub fn reconciled_quantity(quantity: i32, quantity_check: Option<i32>) -> i32 {
    match quantity_check {
        Some(check) if check >= 0 => check,
        _ => quantity,
    }
}

/// Derive a parent transaction's status from its detail statuses.
///
/// The parent tracks the slowest non-cancelled detail; it is cancelled only
/// when every detail is cancelled, and pending when it has no details yet.
pub fn derive_parent_status(details: &[TransactionStatus]) -> TransactionStatus {
    if details.is_empty() {
        return TransactionStatus::Pending;
    }
    let mut min_rank: Option<u8> = None;
    for status in details {
        if let Some(rank) = status.rank() {
            min_rank = Some(match min_rank {
                Some(m) => m.min(rank),
                None => rank,
            });
        }
    }
    match min_rank {
        Some(0) => TransactionStatus::Pending,
        Some(1) => TransactionStatus::Ordered,
        Some(2) => TransactionStatus::Received,
        Some(_) => TransactionStatus::Completed,
        // every detail cancelled
        None => TransactionStatus::Cancelled,
    }
}
