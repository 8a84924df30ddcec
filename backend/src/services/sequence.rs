//! Sequential code generation for items and transactions
//!
//! Codes are derived by scanning the maximum existing numeric suffix for
//! the scope, so they are gap-tolerant after deletions. The scan runs on
//! the caller's open transaction and takes a per-scope advisory lock
//! first: concurrent generators serialize with the insert that consumes
//! the code, so two requests can never compute the same "next" number.

use sqlx::PgConnection;

use crate::error::AppResult;
use shared::models::{format_item_code, format_transaction_code, TransactionType};

/// Generates collision-free human-readable codes. All methods must be
/// called inside the database transaction that inserts the new row.
pub struct SequenceGenerator;

impl SequenceGenerator {
    /// Next item code: "BB-0001", "BB-0002", ...
    pub async fn next_item_code(conn: &mut PgConnection) -> AppResult<String> {
        Self::acquire_scope_lock(conn, "items.code").await?;

        // rows with a malformed suffix produce NULL and are skipped
        let max: Option<i64> = sqlx::query_scalar(
            r"SELECT MAX((regexp_match(code, '^BB-(\d+)$'))[1]::BIGINT) FROM items",
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(format_item_code(max.unwrap_or(0) + 1))
    }

    /// Next transaction code for the given type: "TRX-IN-0001", ...
    /// The sequence is scoped independently per transaction type.
    pub async fn next_transaction_code(
        conn: &mut PgConnection,
        tx_type: TransactionType,
    ) -> AppResult<String> {
        let scope = format!("transactions.code.{}", tx_type.as_str());
        Self::acquire_scope_lock(conn, &scope).await?;

        let max: Option<i64> = sqlx::query_scalar(
            r"SELECT MAX((regexp_match(code, '^TRX-[A-Z]+-(\d+)$'))[1]::BIGINT)
              FROM transactions
              WHERE transaction_type = $1",
        )
        .bind(tx_type.as_str())
        .fetch_one(&mut *conn)
        .await?;

        Ok(format_transaction_code(tx_type, max.unwrap_or(0) + 1))
    }

    /// Transaction-scoped advisory lock; released automatically at
    /// commit/rollback.
    async fn acquire_scope_lock(conn: &mut PgConnection, scope: &str) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(scope)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
