//! HTTP handlers for item management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_admin, CurrentUser};
use crate::services::item::{CreateItemInput, ItemService, UpdateItemInput};
use crate::services::ledger::{ItemStockView, StockLedger};
use crate::AppState;
use shared::models::{Item, ItemMovement};
use shared::types::{ApiResponse, DateRange};

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StockQuery {
    /// Default to an effectively unbounded window when no range is given
    pub fn to_range(&self) -> DateRange {
        let start = self
            .start_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"));
        let end = self
            .end_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2100, 12, 31).expect("valid date"));
        DateRange::new(start, end)
    }
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Get an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Delete an item (admin only)
pub async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user.0)?;
    let service = ItemService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(ApiResponse::message("Item deleted")))
}

/// List all items
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    let service = ItemService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// List items at or below their minimum stock
pub async fn list_low_stock_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    let service = ItemService::new(state.db);
    let items = service.low_stock_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Movement history for an item
pub async fn get_item_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<ItemMovement>>>> {
    let ledger = StockLedger::new(state.db);
    let movements = ledger.movements_for_item(item_id).await?;
    Ok(Json(ApiResponse::success(movements)))
}

/// Current stock and movement aggregates for an item
pub async fn get_item_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<ApiResponse<ItemStockView>>> {
    let ledger = StockLedger::new(state.db);
    let view = ledger.aggregate_movements(item_id, &query.to_range()).await?;
    Ok(Json(ApiResponse::success(view)))
}
