//! HTTP handlers for notification endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::notification::{DispatchSummary, Notification, NotificationService};
use crate::AppState;
use shared::types::ApiResponse;

fn service_from_state(state: &AppState) -> NotificationService {
    NotificationService::new(
        state.db.clone(),
        state.config.notification.webhook_url.clone(),
    )
}

/// List queued notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let service = service_from_state(&state);
    let notifications = service.list().await?;
    Ok(Json(ApiResponse::success(notifications)))
}

/// Dispatch all pending notifications
pub async fn dispatch_notifications(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<DispatchSummary>>> {
    let service = service_from_state(&state);
    let summary = service.dispatch_pending().await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// Mark a notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let service = service_from_state(&state);
    let notification = service.mark_read(notification_id).await?;
    Ok(Json(ApiResponse::success(notification)))
}
