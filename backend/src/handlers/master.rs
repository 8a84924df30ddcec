//! HTTP handlers for master data endpoints (units, categories, suppliers)

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_admin, CurrentUser};
use crate::services::master::{CategoryInput, MasterDataService, SupplierInput, UnitInput};
use crate::AppState;
use shared::models::{Category, Supplier, Unit};
use shared::types::ApiResponse;

// ----------------------------------------------------------------------
// Units
// ----------------------------------------------------------------------

pub async fn create_unit(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<UnitInput>,
) -> AppResult<Json<ApiResponse<Unit>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(service.create_unit(input).await?)))
}

pub async fn update_unit(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<UnitInput>,
) -> AppResult<Json<ApiResponse<Unit>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(
        service.update_unit(unit_id, input).await?,
    )))
}

pub async fn delete_unit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user.0)?;
    let service = MasterDataService::new(state.db);
    service.delete_unit(unit_id).await?;
    Ok(Json(ApiResponse::message("Unit deleted")))
}

pub async fn list_units(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Unit>>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(service.list_units().await?)))
}

// ----------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------

pub async fn create_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(
        service.create_category(input).await?,
    )))
}

pub async fn update_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(
        service.update_category(category_id, input).await?,
    )))
}

pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user.0)?;
    let service = MasterDataService::new(state.db);
    service.delete_category(category_id).await?;
    Ok(Json(ApiResponse::message("Category deleted")))
}

pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(service.list_categories().await?)))
}

// ----------------------------------------------------------------------
// Suppliers
// ----------------------------------------------------------------------

pub async fn create_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(
        service.create_supplier(input).await?,
    )))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(
        service.update_supplier(supplier_id, input).await?,
    )))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user.0)?;
    let service = MasterDataService::new(state.db);
    service.delete_supplier(supplier_id).await?;
    Ok(Json(ApiResponse::message("Supplier deleted")))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Supplier>>>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(ApiResponse::success(service.list_suppliers().await?)))
}
