//! Transaction lifecycle service
//!
//! Orchestrates creation, detail-line mutation and status transitions for
//! IN/OUT/CHECK transactions. Every mutation runs as one database
//! transaction: code generation, row inserts and ledger postings commit or
//! roll back together.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::item::ItemService;
use crate::services::ledger::{ApplyMovementInput, StockLedger};
use crate::services::notification::NotificationService;
use shared::models::{
    derive_parent_status, is_low_stock, reconciled_quantity, DetailTransaction, PurchaseOrderLine,
    Transaction, TransactionStatus, TransactionType,
};
use shared::validation::{
    editable_fields, validate_details, validate_receipt_update, DetailDraft, Violation,
};

/// Detail rows are batch-inserted in bounded chunks to respect backend
/// bind-parameter limits.
const DETAIL_INSERT_CHUNK_SIZE: usize = 100;

/// Transaction lifecycle service
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// Input for creating a transaction with its detail lines
#[derive(Debug, Deserialize)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub transaction_date: Option<NaiveDate>,
    pub details: Vec<DetailInput>,
}

/// One proposed detail line
#[derive(Debug, Deserialize)]
pub struct DetailInput {
    pub item_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub quantity: i32,
    pub quantity_check: Option<i32>,
    pub quantity_difference: Option<i32>,
    pub note: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl DetailInput {
    fn to_draft(&self) -> DetailDraft {
        DetailDraft {
            item_id: self.item_id,
            supplier_id: self.supplier_id,
            quantity: self.quantity,
            quantity_check: self.quantity_check,
            quantity_difference: self.quantity_difference,
            note: self.note.clone(),
            expiry_date: self.expiry_date,
        }
    }
}

/// Patch for an existing detail line; the editable-field table per
/// transaction type decides which of these are accepted.
#[derive(Debug, Deserialize)]
pub struct UpdateDetailInput {
    pub quantity_check: Option<i32>,
    pub note: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Filters for listing transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

/// A transaction together with its detail lines
#[derive(Debug, Serialize)]
pub struct TransactionWithDetails {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub details: Vec<DetailTransaction>,
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: Uuid,
    code: String,
    transaction_type: String,
    status: String,
    transaction_date: NaiveDate,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DetailRow {
    id: Uuid,
    transaction_id: Uuid,
    item_id: Uuid,
    supplier_id: Option<Uuid>,
    quantity: i32,
    quantity_check: Option<i32>,
    quantity_difference: Option<i32>,
    note: Option<String>,
    expiry_date: Option<NaiveDate>,
    status: String,
    stock_posted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Detail row joined with the parent columns the state machine needs
#[derive(Debug, FromRow)]
struct DetailWithParentRow {
    id: Uuid,
    transaction_id: Uuid,
    item_id: Uuid,
    supplier_id: Option<Uuid>,
    quantity: i32,
    quantity_check: Option<i32>,
    quantity_difference: Option<i32>,
    note: Option<String>,
    expiry_date: Option<NaiveDate>,
    status: String,
    stock_posted_at: Option<DateTime<Utc>>,
    parent_type: String,
    parent_status: String,
}

const TRANSACTION_COLUMNS: &str = "id, code, transaction_type, status, transaction_date, \
                                   created_by, created_at, updated_at";

const DETAIL_COLUMNS: &str = "id, transaction_id, item_id, supplier_id, quantity, \
                              quantity_check, quantity_difference, note, expiry_date, \
                              status, stock_posted_at, created_at, updated_at";

fn parse_type(s: &str) -> AppResult<TransactionType> {
    TransactionType::parse(s)
        .ok_or_else(|| AppError::Internal(format!("Unknown transaction type: {}", s)))
}

fn parse_status(s: &str) -> AppResult<TransactionStatus> {
    TransactionStatus::parse(s)
        .ok_or_else(|| AppError::Internal(format!("Unknown transaction status: {}", s)))
}

impl TransactionRow {
    fn into_transaction(self) -> AppResult<Transaction> {
        Ok(Transaction {
            id: self.id,
            code: self.code,
            transaction_type: parse_type(&self.transaction_type)?,
            status: parse_status(&self.status)?,
            transaction_date: self.transaction_date,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DetailRow {
    fn into_detail(self) -> AppResult<DetailTransaction> {
        Ok(DetailTransaction {
            id: self.id,
            transaction_id: self.transaction_id,
            item_id: self.item_id,
            supplier_id: self.supplier_id,
            quantity: self.quantity,
            quantity_check: self.quantity_check,
            quantity_difference: self.quantity_difference,
            note: self.note,
            expiry_date: self.expiry_date,
            status: parse_status(&self.status)?,
            stock_posted_at: self.stock_posted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// The stored difference is always derived from the stored check quantity;
/// the -1 sentinel and absent checks both yield no difference.
fn normalized_difference(quantity: i32, quantity_check: Option<i32>) -> Option<i32> {
    quantity_check.filter(|c| *c >= 0).map(|c| c - quantity)
}

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a transaction with its detail lines in one atomic unit.
    ///
    /// Validation failures are returned before anything is persisted; the
    /// transaction code is generated inside the same database transaction
    /// as the inserts, so a failed request never burns a sequence number.
    pub async fn create(
        &self,
        user: &AuthUser,
        input: CreateTransactionInput,
    ) -> AppResult<TransactionWithDetails> {
        if input.details.is_empty() {
            return Err(AppError::Validation {
                field: "details".to_string(),
                message: "At least one detail line is required".to_string(),
                message_id: "Minimal satu baris detail wajib diisi".to_string(),
            });
        }

        let tx_type = input.transaction_type;
        self.validate_against_catalog(tx_type, &input.details).await?;

        let transaction_date = input
            .transaction_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let code = crate::services::sequence::SequenceGenerator::next_transaction_code(
            &mut tx, tx_type,
        )
        .await?;

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (code, transaction_type, transaction_date, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(&code)
        .bind(tx_type.as_str())
        .bind(transaction_date)
        .bind(user.user_id)
        .fetch_one(&mut *tx)
        .await?;

        let details = insert_details_chunked(&mut tx, row.id, &input.details).await?;

        tx.commit().await?;

        let transaction = row.into_transaction()?;

        // best-effort: group purchased lines by supplier and queue the
        // purchase-order notifications
        if tx_type == TransactionType::In {
            if let Err(e) = self.queue_purchase_order(&transaction).await {
                tracing::warn!(
                    "Failed to queue purchase-order notification for {}: {:?}",
                    transaction.code,
                    e
                );
            }
        }

        Ok(TransactionWithDetails {
            transaction,
            details,
        })
    }

    /// Append detail lines to a pending transaction
    pub async fn add_details(
        &self,
        transaction_id: Uuid,
        details: Vec<DetailInput>,
    ) -> AppResult<Vec<DetailTransaction>> {
        if details.is_empty() {
            return Err(AppError::Validation {
                field: "details".to_string(),
                message: "At least one detail line is required".to_string(),
                message_id: "Minimal satu baris detail wajib diisi".to_string(),
            });
        }

        let parent = self.load_transaction(transaction_id).await?;
        if parent.status != TransactionStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "Details can only be added while the transaction is pending (currently {})",
                parent.status
            )));
        }

        self.validate_against_catalog(parent.transaction_type, &details)
            .await?;

        let mut tx = self.db.begin().await?;
        let inserted = insert_details_chunked(&mut tx, transaction_id, &details).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    /// Update an editable detail line.
    ///
    /// CHECK details are system-computed and never hand-edited; IN details
    /// accept receipt data (checked quantity, note, expiry) while pending
    /// or ordered; OUT details accept only a note while pending.
    pub async fn update_detail(
        &self,
        detail_id: Uuid,
        patch: UpdateDetailInput,
    ) -> AppResult<DetailTransaction> {
        let row = self.load_detail_with_parent(detail_id).await?;
        let tx_type = parse_type(&row.parent_type)?;
        let detail_status = parse_status(&row.status)?;

        if tx_type == TransactionType::Check {
            return Err(AppError::Validation {
                field: "transaction_type".to_string(),
                message: "Check details are system-computed and cannot be edited".to_string(),
                message_id: "Detail pemeriksaan dihitung sistem dan tidak dapat diubah".to_string(),
            });
        }

        let editable_while = match tx_type {
            TransactionType::In => matches!(
                detail_status,
                TransactionStatus::Pending | TransactionStatus::Ordered
            ),
            _ => detail_status == TransactionStatus::Pending,
        };
        if !editable_while {
            return Err(AppError::InvalidStateTransition(format!(
                "Detail in status {} can no longer be edited",
                detail_status
            )));
        }

        let mut violations: Vec<Violation> = Vec::new();
        let allowed = editable_fields(tx_type);
        for (field, touched) in [
            ("quantity_check", patch.quantity_check.is_some()),
            ("note", patch.note.is_some()),
            ("expiry_date", patch.expiry_date.is_some()),
        ] {
            if touched && !allowed.contains(&field) {
                violations.push(Violation {
                    line_index: 0,
                    field: field.to_string(),
                    message: format!(
                        "Field {} is not editable on {} details",
                        field,
                        tx_type.as_str()
                    ),
                    message_id: format!(
                        "Kolom {} tidak dapat diubah pada detail {}",
                        field,
                        tx_type.as_str()
                    ),
                });
            }
        }

        // receipt rules: check-quantity range and shortfall note
        if let Some(check) = patch.quantity_check {
            let effective_note = patch.note.as_deref().or(row.note.as_deref());
            violations.extend(validate_receipt_update(row.quantity, check, effective_note));
        }

        if !violations.is_empty() {
            return Err(AppError::DetailValidation(violations));
        }

        let effective_check = patch.quantity_check.or(row.quantity_check);
        let difference = normalized_difference(row.quantity, effective_check);

        let updated = sqlx::query_as::<_, DetailRow>(&format!(
            r#"
            UPDATE detail_transactions
            SET quantity_check = $1,
                quantity_difference = $2,
                note = COALESCE($3, note),
                expiry_date = COALESCE($4, expiry_date)
            WHERE id = $5
            RETURNING {}
            "#,
            DETAIL_COLUMNS
        ))
        .bind(effective_check)
        .bind(difference)
        .bind(&patch.note)
        .bind(patch.expiry_date)
        .bind(detail_id)
        .fetch_one(&self.db)
        .await?;

        updated.into_detail()
    }

    /// Move a detail line through the state machine, posting the stock
    /// movement exactly once when a stock-effecting state is first entered.
    pub async fn update_detail_status(
        &self,
        detail_id: Uuid,
        new_status: TransactionStatus,
    ) -> AppResult<DetailTransaction> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, DetailWithParentRow>(
            r#"
            SELECT d.id, d.transaction_id, d.item_id, d.supplier_id, d.quantity,
                   d.quantity_check, d.quantity_difference, d.note, d.expiry_date,
                   d.status, d.stock_posted_at,
                   t.transaction_type AS parent_type, t.status AS parent_status
            FROM detail_transactions d
            JOIN transactions t ON t.id = d.transaction_id
            WHERE d.id = $1
            FOR UPDATE
            "#,
        )
        .bind(detail_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Detail transaction".to_string()))?;

        let tx_type = parse_type(&row.parent_type)?;
        let parent_status = parse_status(&row.parent_status)?;
        let detail_status = parse_status(&row.status)?;

        if parent_status.is_terminal() {
            return Err(AppError::InvalidStateTransition(format!(
                "Transaction is {} and cannot be modified",
                parent_status
            )));
        }

        if !detail_status.can_transition_to(new_status, tx_type) {
            return Err(AppError::InvalidStateTransition(format!(
                "{} -> {} is not a valid transition for {} transactions",
                detail_status,
                new_status,
                tx_type.as_str()
            )));
        }

        sqlx::query("UPDATE detail_transactions SET status = $1 WHERE id = $2")
            .bind(new_status.as_str())
            .bind(detail_id)
            .execute(&mut *tx)
            .await?;

        if new_status.triggers_stock_posting(tx_type) && row.stock_posted_at.is_none() {
            let reconciled = reconciled_quantity(row.quantity, row.quantity_check);
            let delta = match tx_type {
                TransactionType::In => reconciled,
                TransactionType::Out => -reconciled,
                TransactionType::Check => row.quantity_difference.unwrap_or(0),
            };

            if delta != 0 {
                StockLedger::apply_movement_on(
                    &mut tx,
                    &ApplyMovementInput {
                        transaction_id: row.transaction_id,
                        detail_transaction_id: Some(detail_id),
                        item_id: row.item_id,
                        movement_type: tx_type.into(),
                        quantity_delta: delta,
                        expiry_date: row.expiry_date,
                    },
                )
                .await?;
            }

            sqlx::query("UPDATE detail_transactions SET stock_posted_at = NOW() WHERE id = $1")
                .bind(detail_id)
                .execute(&mut *tx)
                .await?;
        }

        derive_and_store_parent_status(&mut tx, row.transaction_id).await?;

        let updated = sqlx::query_as::<_, DetailRow>(&format!(
            "SELECT {} FROM detail_transactions WHERE id = $1",
            DETAIL_COLUMNS
        ))
        .bind(detail_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        // best-effort low-stock alert once outgoing stock has been posted
        if tx_type == TransactionType::Out && new_status == TransactionStatus::Completed {
            if let Err(e) = self.queue_low_stock_alert(row.item_id).await {
                tracing::warn!("Failed to queue low-stock notification: {:?}", e);
            }
        }

        updated.into_detail()
    }

    /// Delete a detail line before any stock movement has been posted
    pub async fn delete_detail(&self, detail_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, DetailWithParentRow>(
            r#"
            SELECT d.id, d.transaction_id, d.item_id, d.supplier_id, d.quantity,
                   d.quantity_check, d.quantity_difference, d.note, d.expiry_date,
                   d.status, d.stock_posted_at,
                   t.transaction_type AS parent_type, t.status AS parent_status
            FROM detail_transactions d
            JOIN transactions t ON t.id = d.transaction_id
            WHERE d.id = $1
            FOR UPDATE
            "#,
        )
        .bind(detail_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Detail transaction".to_string()))?;

        let parent_status = parse_status(&row.parent_status)?;
        let detail_status = parse_status(&row.status)?;

        if parent_status.is_terminal() || detail_status.is_terminal() {
            return Err(AppError::InvalidStateTransition(
                "Completed or cancelled details cannot be deleted".to_string(),
            ));
        }
        if row.stock_posted_at.is_some() {
            return Err(AppError::InvalidStateTransition(
                "A stock movement has already been posted for this detail".to_string(),
            ));
        }

        sqlx::query("DELETE FROM detail_transactions WHERE id = $1")
            .bind(detail_id)
            .execute(&mut *tx)
            .await?;

        derive_and_store_parent_status(&mut tx, row.transaction_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a transaction and (by cascade) its details. Only permitted
    /// while nothing has touched the stock ledger.
    pub async fn delete(&self, transaction_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transactions WHERE id = $1 FOR UPDATE",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        let status = parse_status(&row.status)?;
        if status.is_terminal() {
            return Err(AppError::InvalidStateTransition(format!(
                "Transaction is {} and cannot be deleted",
                status
            )));
        }

        let posted: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM detail_transactions \
             WHERE transaction_id = $1 AND stock_posted_at IS NOT NULL",
        )
        .bind(transaction_id)
        .fetch_one(&mut *tx)
        .await?;

        if posted > 0 {
            return Err(AppError::InvalidStateTransition(
                "Stock movements have already been posted for this transaction".to_string(),
            ));
        }

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get a transaction with its detail lines
    pub async fn get(&self, transaction_id: Uuid) -> AppResult<TransactionWithDetails> {
        let transaction = self.load_transaction(transaction_id).await?;

        let rows = sqlx::query_as::<_, DetailRow>(&format!(
            "SELECT {} FROM detail_transactions WHERE transaction_id = $1 ORDER BY created_at",
            DETAIL_COLUMNS
        ))
        .bind(transaction_id)
        .fetch_all(&self.db)
        .await?;

        let details = rows
            .into_iter()
            .map(DetailRow::into_detail)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(TransactionWithDetails {
            transaction,
            details,
        })
    }

    /// List transactions, optionally filtered by type and status
    pub async fn list(&self, filter: &TransactionFilter) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE ($1::TEXT IS NULL OR transaction_type = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }

    async fn load_transaction(&self, transaction_id: Uuid) -> AppResult<Transaction> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transactions WHERE id = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?
        .into_transaction()
    }

    async fn load_detail_with_parent(&self, detail_id: Uuid) -> AppResult<DetailWithParentRow> {
        sqlx::query_as::<_, DetailWithParentRow>(
            r#"
            SELECT d.id, d.transaction_id, d.item_id, d.supplier_id, d.quantity,
                   d.quantity_check, d.quantity_difference, d.note, d.expiry_date,
                   d.status, d.stock_posted_at,
                   t.transaction_type AS parent_type, t.status AS parent_status
            FROM detail_transactions d
            JOIN transactions t ON t.id = d.transaction_id
            WHERE d.id = $1
            "#,
        )
        .bind(detail_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Detail transaction".to_string()))
    }

    /// Run the shared validator against a fresh item-catalog snapshot
    async fn validate_against_catalog(
        &self,
        tx_type: TransactionType,
        details: &[DetailInput],
    ) -> AppResult<()> {
        let item_ids: Vec<Uuid> = details.iter().map(|d| d.item_id).collect();
        let catalog = ItemService::new(self.db.clone())
            .catalog_for(&item_ids)
            .await?;

        let drafts: Vec<DetailDraft> = details.iter().map(DetailInput::to_draft).collect();
        let violations = validate_details(tx_type, &drafts, &catalog);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::DetailValidation(violations))
        }
    }

    async fn queue_purchase_order(&self, transaction: &Transaction) -> AppResult<()> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, i32, String)>(
            r#"
            SELECT d.supplier_id, s.name, i.name, d.quantity, u.name
            FROM detail_transactions d
            JOIN suppliers s ON s.id = d.supplier_id
            JOIN items i ON i.id = d.item_id
            JOIN units u ON u.id = i.unit_id
            WHERE d.transaction_id = $1
            ORDER BY s.name, i.name
            "#,
        )
        .bind(transaction.id)
        .fetch_all(&self.db)
        .await?;

        let lines: Vec<PurchaseOrderLine> = rows
            .into_iter()
            .map(
                |(supplier_id, supplier_name, item_name, quantity, unit_name)| PurchaseOrderLine {
                    supplier_id,
                    supplier_name,
                    item_name,
                    quantity,
                    unit_name,
                },
            )
            .collect();

        NotificationService::new(self.db.clone(), None)
            .queue_purchase_order(&transaction.code, &lines)
            .await
    }

    async fn queue_low_stock_alert(&self, item_id: Uuid) -> AppResult<()> {
        let (name, stock_quantity, min_stock) = sqlx::query_as::<_, (String, i32, i32)>(
            "SELECT name, stock_quantity, min_stock FROM items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        if is_low_stock(stock_quantity, min_stock) {
            NotificationService::new(self.db.clone(), None)
                .queue_low_stock(item_id, &name, stock_quantity, min_stock)
                .await?;
        }
        Ok(())
    }
}

/// Batch-insert detail rows in bounded chunks on the caller's transaction.
/// The stored `quantity_difference` is always recomputed from the stored
/// check quantity; client-supplied differences only pass validation.
async fn insert_details_chunked(
    conn: &mut PgConnection,
    transaction_id: Uuid,
    details: &[DetailInput],
) -> AppResult<Vec<DetailTransaction>> {
    let mut inserted = Vec::with_capacity(details.len());

    for chunk in details.chunks(DETAIL_INSERT_CHUNK_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO detail_transactions (transaction_id, item_id, supplier_id, quantity, \
             quantity_check, quantity_difference, note, expiry_date) ",
        );
        builder.push_values(chunk, |mut b, d| {
            b.push_bind(transaction_id)
                .push_bind(d.item_id)
                .push_bind(d.supplier_id)
                .push_bind(d.quantity)
                .push_bind(d.quantity_check)
                .push_bind(normalized_difference(d.quantity, d.quantity_check))
                .push_bind(d.note.clone())
                .push_bind(d.expiry_date);
        });
        builder.push(" RETURNING ");
        builder.push(DETAIL_COLUMNS);

        let rows: Vec<DetailRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
        for row in rows {
            inserted.push(row.into_detail()?);
        }
    }

    Ok(inserted)
}

/// Recompute the parent's status from its remaining details
async fn derive_and_store_parent_status(
    conn: &mut PgConnection,
    transaction_id: Uuid,
) -> AppResult<()> {
    let status_strings: Vec<String> =
        sqlx::query_scalar("SELECT status FROM detail_transactions WHERE transaction_id = $1")
            .bind(transaction_id)
            .fetch_all(&mut *conn)
            .await?;

    let statuses = status_strings
        .iter()
        .map(|s| parse_status(s))
        .collect::<AppResult<Vec<_>>>()?;

    let parent_status = derive_parent_status(&statuses);

    sqlx::query("UPDATE transactions SET status = $1 WHERE id = $2")
        .bind(parent_status.as_str())
        .bind(transaction_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
