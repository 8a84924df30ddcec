//! Reporting service for stock analytics and data export
//!
//! Reports are derived from the movement ledger and transaction history;
//! they are informational reads and may lag concurrent writes slightly.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::range_bounds;
use shared::models::{utilization_rate, MovementSummary, StockStatus};
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// One row of the per-item stock report
#[derive(Debug, Serialize)]
pub struct StockReportRow {
    pub item_id: Uuid,
    pub code: String,
    pub name: String,
    pub category_name: String,
    pub unit_name: String,
    pub current_stock: i32,
    pub min_stock: i32,
    pub total_in: i64,
    pub total_out: i64,
    pub net_movement: i64,
    pub stock_at_period_start: i64,
    pub stock_at_period_end: i64,
    pub stock_status: StockStatus,
    pub utilization_rate: Decimal,
    pub transaction_count: i64,
}

/// Pending transaction counts per type, for dashboard sidebars.
/// Pull-based: callers re-query on demand instead of subscribing.
#[derive(Debug, Serialize)]
pub struct PendingCounts {
    #[serde(rename = "in")]
    pub incoming: i64,
    #[serde(rename = "out")]
    pub outgoing: i64,
    pub check: i64,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub total_transactions: i64,
    pub pending: PendingCounts,
    pub movements_last_7_days: i64,
}

#[derive(Debug, FromRow)]
struct ReportRow {
    item_id: Uuid,
    code: String,
    name: String,
    category_name: String,
    unit_name: String,
    current_stock: i32,
    min_stock: i32,
    total_in: i64,
    total_out: i64,
    delta_after: i64,
    transaction_count: i64,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Per-item stock report over a date window
    pub async fn stock_report(&self, range: &DateRange) -> AppResult<Vec<StockReportRow>> {
        let (window_start, window_end) = range_bounds(range)?;

        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT i.id AS item_id, i.code, i.name,
                   c.name AS category_name, u.name AS unit_name,
                   i.stock_quantity AS current_stock, i.min_stock,
                   COALESCE(SUM(m.quantity_delta) FILTER (
                       WHERE m.created_at >= $1 AND m.created_at < $2
                         AND m.quantity_delta > 0), 0) AS total_in,
                   COALESCE(-SUM(m.quantity_delta) FILTER (
                       WHERE m.created_at >= $1 AND m.created_at < $2
                         AND m.quantity_delta < 0), 0) AS total_out,
                   COALESCE(SUM(m.quantity_delta) FILTER (
                       WHERE m.created_at >= $2), 0) AS delta_after,
                   COUNT(DISTINCT m.transaction_id) FILTER (
                       WHERE m.created_at >= $1 AND m.created_at < $2) AS transaction_count
            FROM items i
            JOIN categories c ON c.id = i.category_id
            JOIN units u ON u.id = i.unit_id
            LEFT JOIN item_movements m ON m.item_id = i.id
            GROUP BY i.id, i.code, i.name, c.name, u.name, i.stock_quantity, i.min_stock
            ORDER BY i.code
            "#,
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(assemble_report_row).collect())
    }

    /// Pending transaction counts per type
    pub async fn pending_counts(&self) -> AppResult<PendingCounts> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT transaction_type, COUNT(*)
            FROM transactions
            WHERE status = 'pending'
            GROUP BY transaction_type
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut counts = PendingCounts {
            incoming: 0,
            outgoing: 0,
            check: 0,
        };
        for (transaction_type, count) in rows {
            match transaction_type.as_str() {
                "in" => counts.incoming = count,
                "out" => counts.outgoing = count,
                "check" => counts.check = count,
                _ => {}
            }
        }
        Ok(counts)
    }

    /// Headline metrics for the dashboard
    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.db)
            .await?;

        let low_stock_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE stock_quantity <= min_stock")
                .fetch_one(&self.db)
                .await?;

        let total_transactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.db)
            .await?;

        let movements_last_7_days: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM item_movements WHERE created_at >= NOW() - INTERVAL '7 days'",
        )
        .fetch_one(&self.db)
        .await?;

        let pending = self.pending_counts().await?;

        Ok(DashboardMetrics {
            total_items,
            low_stock_items,
            total_transactions,
            pending,
            movements_last_7_days,
        })
    }

    /// Export a stock report as CSV using the typed field-accessor map
    pub fn export_stock_report_csv(rows: &[StockReportRow]) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(STOCK_REPORT_FIELDS.iter().map(|(name, _)| *name))
            .map_err(|e| crate::error::AppError::Internal(format!("CSV write failed: {}", e)))?;

        for row in rows {
            writer
                .write_record(STOCK_REPORT_FIELDS.iter().map(|(_, extract)| extract(row)))
                .map_err(|e| {
                    crate::error::AppError::Internal(format!("CSV write failed: {}", e))
                })?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::AppError::Internal(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| crate::error::AppError::Internal(format!("CSV encoding failed: {}", e)))
    }
}

fn assemble_report_row(row: ReportRow) -> StockReportRow {
    let summary = MovementSummary::from_window(
        i64::from(row.current_stock),
        row.total_in,
        row.total_out,
        row.delta_after,
    );

    StockReportRow {
        item_id: row.item_id,
        code: row.code,
        name: row.name,
        category_name: row.category_name,
        unit_name: row.unit_name,
        current_stock: row.current_stock,
        min_stock: row.min_stock,
        total_in: summary.total_in,
        total_out: summary.total_out,
        net_movement: summary.net_movement,
        stock_at_period_start: summary.stock_at_period_start,
        stock_at_period_end: summary.stock_at_period_end,
        stock_status: StockStatus::classify(row.current_stock, row.min_stock),
        utilization_rate: utilization_rate(summary.total_out, summary.stock_at_period_start),
        transaction_count: row.transaction_count,
    }
}

/// Export columns resolved at compile time; no dynamic field lookup
type FieldExtractor = fn(&StockReportRow) -> String;

const STOCK_REPORT_FIELDS: &[(&str, FieldExtractor)] = &[
    ("code", |r| r.code.clone()),
    ("name", |r| r.name.clone()),
    ("category", |r| r.category_name.clone()),
    ("unit", |r| r.unit_name.clone()),
    ("current_stock", |r| r.current_stock.to_string()),
    ("min_stock", |r| r.min_stock.to_string()),
    ("total_in", |r| r.total_in.to_string()),
    ("total_out", |r| r.total_out.to_string()),
    ("net_movement", |r| r.net_movement.to_string()),
    ("stock_at_period_start", |r| {
        r.stock_at_period_start.to_string()
    }),
    ("stock_at_period_end", |r| r.stock_at_period_end.to_string()),
    ("stock_status", |r| r.stock_status.as_str().to_string()),
    ("utilization_rate", |r| r.utilization_rate.to_string()),
    ("transaction_count", |r| r.transaction_count.to_string()),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_row() -> StockReportRow {
        StockReportRow {
            item_id: Uuid::new_v4(),
            code: "BB-0001".to_string(),
            name: "Beras".to_string(),
            category_name: "Bahan Kering".to_string(),
            unit_name: "Kilogram".to_string(),
            current_stock: 40,
            min_stock: 10,
            total_in: 100,
            total_out: 60,
            net_movement: 40,
            stock_at_period_start: 0,
            stock_at_period_end: 40,
            stock_status: StockStatus::Normal,
            utilization_rate: Decimal::ZERO,
            transaction_count: 3,
        }
    }

    #[test]
    fn csv_header_matches_accessor_map() {
        let csv = ReportingService::export_stock_report_csv(&[sample_row()]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("code,name,category,unit,current_stock"));
        let data = lines.next().unwrap();
        assert!(data.starts_with("BB-0001,Beras,"));
        assert!(data.contains("normal"));
    }

    #[test]
    fn csv_row_count_matches_input() {
        let rows = vec![sample_row(), sample_row(), sample_row()];
        let csv = ReportingService::export_stock_report_csv(&rows).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }
}
