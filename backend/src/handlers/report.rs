//! Reporting handlers for stock analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::item::ItemService;
use crate::services::report::{DashboardMetrics, PendingCounts, ReportingService};
use crate::AppState;
use shared::models::Item;
use shared::types::{ApiResponse, DateRange};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub format: Option<String>, // "json" or "csv"
}

impl ReportQuery {
    fn to_range(&self) -> DateRange {
        let start = self
            .start_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"));
        let end = self
            .end_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2100, 12, 31).expect("valid date"));
        DateRange::new(start, end)
    }
}

/// Per-item stock report; `?format=csv` exports the same rows as CSV
pub async fn get_stock_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone());
    let rows = service.stock_report(&query.to_range()).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_stock_report_csv(&rows)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"stock_report.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(ApiResponse::success(rows)).into_response())
    }
}

/// Items at or below minimum stock, from the live ledger view
pub async fn get_low_stock_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    let service = ItemService::new(state.db.clone());
    let items = service.low_stock_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Pending transaction counts per type
pub async fn get_pending_counts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<PendingCounts>>> {
    let service = ReportingService::new(state.db.clone());
    let counts = service.pending_counts().await?;
    Ok(Json(ApiResponse::success(counts)))
}

/// Dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<DashboardMetrics>>> {
    let service = ReportingService::new(state.db.clone());
    let metrics = service.dashboard_metrics().await?;
    Ok(Json(ApiResponse::success(metrics)))
}
