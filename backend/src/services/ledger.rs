//! Stock ledger: the single owner of item stock quantities
//!
//! Every stock change goes through `apply_movement`, which updates the
//! item's quantity and appends an immutable movement row in the same
//! database transaction. The guarded update re-checks non-negativity at
//! application time: validation alone cannot prevent two concurrent OUT
//! transactions from jointly overdrawing a stale stock read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ItemMovement, MovementSummary, MovementType};
use shared::types::DateRange;

/// Stock ledger service
#[derive(Clone)]
pub struct StockLedger {
    db: PgPool,
}

/// Input for posting one stock movement
#[derive(Debug, Clone)]
pub struct ApplyMovementInput {
    pub transaction_id: Uuid,
    pub detail_transaction_id: Option<Uuid>,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_delta: i32,
    pub expiry_date: Option<NaiveDate>,
}

/// Current stock together with its movement window
#[derive(Debug, Serialize)]
pub struct ItemStockView {
    pub item_id: Uuid,
    pub current_stock: i32,
    pub summary: MovementSummary,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    transaction_id: Uuid,
    detail_transaction_id: Option<Uuid>,
    item_id: Uuid,
    movement_type: String,
    quantity_delta: i32,
    expiry_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl MovementRow {
    fn into_movement(self) -> AppResult<ItemMovement> {
        let movement_type = MovementType::parse(&self.movement_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown movement type: {}", self.movement_type))
        })?;
        Ok(ItemMovement {
            id: self.id,
            transaction_id: self.transaction_id,
            detail_transaction_id: self.detail_transaction_id,
            item_id: self.item_id,
            movement_type,
            quantity_delta: self.quantity_delta,
            expiry_date: self.expiry_date,
            created_at: self.created_at,
        })
    }
}

const MOVEMENT_COLUMNS: &str = "id, transaction_id, detail_transaction_id, item_id, \
                                movement_type, quantity_delta, expiry_date, created_at";

impl StockLedger {
    /// Create a new StockLedger instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Authoritative quantity-on-hand for an item
    pub async fn current_stock(&self, item_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT stock_quantity FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    /// Apply a movement in its own transaction
    pub async fn apply_movement(&self, input: &ApplyMovementInput) -> AppResult<ItemMovement> {
        let mut tx = self.db.begin().await?;
        let movement = Self::apply_movement_on(&mut tx, input).await?;
        tx.commit().await?;
        Ok(movement)
    }

    /// Apply a movement on the caller's open transaction: atomically adjust
    /// the item's stock and append the movement row.
    ///
    /// The update refuses to drive stock below zero and fails with
    /// `InsufficientStock` instead; callers must not retry blindly.
    pub async fn apply_movement_on(
        conn: &mut PgConnection,
        input: &ApplyMovementInput,
    ) -> AppResult<ItemMovement> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE items
            SET stock_quantity = stock_quantity + $1, updated_at = NOW()
            WHERE id = $2 AND stock_quantity + $1 >= 0
            RETURNING stock_quantity
            "#,
        )
        .bind(input.quantity_delta)
        .bind(input.item_id)
        .fetch_optional(&mut *conn)
        .await?;

        if updated.is_none() {
            // either the item vanished or the delta would overdraw it
            let existing = sqlx::query_as::<_, (String, i32)>(
                "SELECT name, stock_quantity FROM items WHERE id = $1",
            )
            .bind(input.item_id)
            .fetch_optional(&mut *conn)
            .await?;

            return match existing {
                None => Err(AppError::NotFound("Item".to_string())),
                Some((name, stock)) => Err(AppError::InsufficientStock(format!(
                    "{}: {} on hand, movement of {} refused",
                    name, stock, input.quantity_delta
                ))),
            };
        }

        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            INSERT INTO item_movements (
                transaction_id, detail_transaction_id, item_id,
                movement_type, quantity_delta, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(input.transaction_id)
        .bind(input.detail_transaction_id)
        .bind(input.item_id)
        .bind(input.movement_type.as_str())
        .bind(input.quantity_delta)
        .bind(input.expiry_date)
        .fetch_one(&mut *conn)
        .await?;

        row.into_movement()
    }

    /// Movement history for an item, newest first
    pub async fn movements_for_item(&self, item_id: Uuid) -> AppResult<Vec<ItemMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {} FROM item_movements WHERE item_id = $1 ORDER BY created_at DESC",
            MOVEMENT_COLUMNS
        ))
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(MovementRow::into_movement).collect()
    }

    /// Aggregate an item's movements inside a date window, replaying the
    /// deltas against the current stock snapshot to reconstruct the stock
    /// at the window boundaries.
    pub async fn aggregate_movements(
        &self,
        item_id: Uuid,
        range: &DateRange,
    ) -> AppResult<ItemStockView> {
        let current_stock = self.current_stock(item_id).await?;
        let (window_start, window_end) = range_bounds(range)?;

        let (total_in, total_out, delta_after) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COALESCE(SUM(quantity_delta) FILTER (
                    WHERE created_at >= $2 AND created_at < $3 AND quantity_delta > 0), 0),
                COALESCE(-SUM(quantity_delta) FILTER (
                    WHERE created_at >= $2 AND created_at < $3 AND quantity_delta < 0), 0),
                COALESCE(SUM(quantity_delta) FILTER (WHERE created_at >= $3), 0)
            FROM item_movements
            WHERE item_id = $1
            "#,
        )
        .bind(item_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_one(&self.db)
        .await?;

        let summary = MovementSummary::from_window(
            i64::from(current_stock),
            total_in,
            total_out,
            delta_after,
        );

        Ok(ItemStockView {
            item_id,
            current_stock,
            summary,
        })
    }
}

/// Convert an inclusive date range into half-open UTC timestamp bounds
pub fn range_bounds(range: &DateRange) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = range.start.and_time(chrono::NaiveTime::MIN).and_utc();
    let end_exclusive = range
        .end
        .succ_opt()
        .ok_or_else(|| AppError::Internal("Date range end out of bounds".to_string()))?
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();
    Ok((start, end_exclusive))
}
