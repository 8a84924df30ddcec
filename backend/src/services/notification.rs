//! Notification service
//!
//! The core only queues notifications and composes their messages;
//! delivery is an external concern. An optional webhook client POSTs
//! queued rows to a configured endpoint on dispatch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    compose_low_stock_message, compose_purchase_order_message, group_by_supplier,
    NotificationStatus, NotificationType, PurchaseOrderLine,
};

/// Notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    webhook: Option<WebhookClient>,
}

/// Webhook dispatch client
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, notification: &Notification) -> AppResult<()> {
        let response = self
            .http_client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Webhook returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Queued notification record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: String,
    pub supplier_id: Option<Uuid>,
    pub item_id: Option<Uuid>,
    pub message_en: String,
    pub message_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Result of a dispatch run
#[derive(Debug, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

const NOTIFICATION_COLUMNS: &str = "id, notification_type, supplier_id, item_id, \
                                    message_en, message_id, status, created_at, sent_at";

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool, webhook_url: Option<String>) -> Self {
        Self {
            db,
            webhook: webhook_url.map(WebhookClient::new),
        }
    }

    /// Queue one purchase-order notification per supplier appearing in the
    /// purchased lines
    pub async fn queue_purchase_order(
        &self,
        transaction_code: &str,
        lines: &[PurchaseOrderLine],
    ) -> AppResult<()> {
        for order in group_by_supplier(lines) {
            let (message_en, message_id) =
                compose_purchase_order_message(transaction_code, &order);

            sqlx::query(
                r#"
                INSERT INTO notifications (notification_type, supplier_id, message_en, message_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(NotificationType::PurchaseOrder.as_str())
            .bind(order.supplier_id)
            .bind(&message_en)
            .bind(&message_id)
            .execute(&self.db)
            .await?;
        }
        Ok(())
    }

    /// Queue a low-stock alert for an item
    pub async fn queue_low_stock(
        &self,
        item_id: Uuid,
        item_name: &str,
        stock_quantity: i32,
        min_stock: i32,
    ) -> AppResult<()> {
        let (message_en, message_id) =
            compose_low_stock_message(item_name, stock_quantity, min_stock);

        sqlx::query(
            r#"
            INSERT INTO notifications (notification_type, item_id, message_en, message_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(NotificationType::LowStock.as_str())
        .bind(item_id)
        .bind(&message_en)
        .bind(&message_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// List notifications, newest first
    pub async fn list(&self) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Dispatch pending notifications. With a webhook configured each row
    /// is POSTed and marked sent/failed; without one, rows are marked sent
    /// immediately since in-app listing is the only delivery channel.
    pub async fn dispatch_pending(&self) -> AppResult<DispatchSummary> {
        let pending = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE status = $1 ORDER BY created_at",
            NOTIFICATION_COLUMNS
        ))
        .bind(NotificationStatus::Pending.as_str())
        .fetch_all(&self.db)
        .await?;

        let mut summary = DispatchSummary { sent: 0, failed: 0 };

        for notification in pending {
            let outcome = match &self.webhook {
                Some(client) => client.send(&notification).await,
                None => Ok(()),
            };

            let status = match outcome {
                Ok(()) => {
                    summary.sent += 1;
                    NotificationStatus::Sent
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to dispatch notification {}: {:?}",
                        notification.id,
                        e
                    );
                    summary.failed += 1;
                    NotificationStatus::Failed
                }
            };

            sqlx::query("UPDATE notifications SET status = $1, sent_at = NOW() WHERE id = $2")
                .bind(status.as_str())
                .bind(notification.id)
                .execute(&self.db)
                .await?;
        }

        Ok(summary)
    }

    /// Mark a notification as read
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET status = $1 WHERE id = $2 RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(NotificationStatus::Read.as_str())
        .bind(notification_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;

        Ok(row)
    }
}
