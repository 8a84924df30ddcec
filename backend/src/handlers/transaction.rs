//! HTTP handlers for transaction lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_admin, CurrentUser};
use crate::services::transaction::{
    CreateTransactionInput, DetailInput, TransactionFilter, TransactionService,
    TransactionWithDetails, UpdateDetailInput,
};
use crate::AppState;
use shared::models::{DetailTransaction, Transaction, TransactionStatus};
use shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct AddDetailsInput {
    pub details: Vec<DetailInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDetailStatusInput {
    pub status: TransactionStatus,
}

/// Create a transaction with its detail lines
pub async fn create_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTransactionInput>,
) -> AppResult<Json<ApiResponse<TransactionWithDetails>>> {
    let service = TransactionService::new(state.db);
    let created = service.create(&current_user.0, input).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// List transactions with optional type/status filters
pub async fn list_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    let service = TransactionService::new(state.db);
    let transactions = service.list(&filter).await?;
    Ok(Json(ApiResponse::success(transactions)))
}

/// Get a transaction with its detail lines
pub async fn get_transaction(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TransactionWithDetails>>> {
    let service = TransactionService::new(state.db);
    let transaction = service.get(transaction_id).await?;
    Ok(Json(ApiResponse::success(transaction)))
}

/// Delete a transaction before stock has been affected (admin only)
pub async fn delete_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user.0)?;
    let service = TransactionService::new(state.db);
    service.delete(transaction_id).await?;
    Ok(Json(ApiResponse::message("Transaction deleted")))
}

/// Append detail lines to a pending transaction
pub async fn add_details(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<AddDetailsInput>,
) -> AppResult<Json<ApiResponse<Vec<DetailTransaction>>>> {
    let service = TransactionService::new(state.db);
    let details = service.add_details(transaction_id, input.details).await?;
    Ok(Json(ApiResponse::success(details)))
}

/// Update an editable detail line
pub async fn update_detail(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(detail_id): Path<Uuid>,
    Json(input): Json<UpdateDetailInput>,
) -> AppResult<Json<ApiResponse<DetailTransaction>>> {
    let service = TransactionService::new(state.db);
    let detail = service.update_detail(detail_id, input).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Move a detail line through the status state machine
pub async fn update_detail_status(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(detail_id): Path<Uuid>,
    Json(input): Json<UpdateDetailStatusInput>,
) -> AppResult<Json<ApiResponse<DetailTransaction>>> {
    let service = TransactionService::new(state.db);
    let detail = service.update_detail_status(detail_id, input.status).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Delete a detail line before its stock movement is posted
pub async fn delete_detail(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(detail_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = TransactionService::new(state.db);
    service.delete_detail(detail_id).await?;
    Ok(Json(ApiResponse::message("Detail deleted")))
}
