//! Raw-material item service
//!
//! Item stock is never written here: `stock_quantity` belongs to the stock
//! ledger. This service owns item master data and the catalog snapshot the
//! transaction validator runs against.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{map_unique_violation, AppError, AppResult};
use crate::services::sequence::SequenceGenerator;
use shared::models::Item;
use shared::validation::{ItemCatalog, ItemSnapshot};

/// Item service
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Input for creating an item. New items start with zero stock; quantities
/// arrive through IN transactions.
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub unit_id: Uuid,
    pub category_id: Uuid,
    pub min_stock: i32,
}

/// Input for updating an item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub unit_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub min_stock: Option<i32>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    code: String,
    name: String,
    unit_id: Uuid,
    category_id: Uuid,
    stock_quantity: i32,
    min_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            code: row.code,
            name: row.name,
            unit_id: row.unit_id,
            category_id: row.category_id,
            stock_quantity: row.stock_quantity,
            min_stock: row.min_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, code, name, unit_id, category_id, stock_quantity, \
                            min_stock, created_at, updated_at";

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an item, generating its code inside the same transaction
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<Item> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name must not be empty".to_string(),
                message_id: "Nama tidak boleh kosong".to_string(),
            });
        }
        if input.min_stock < 0 {
            return Err(AppError::Validation {
                field: "min_stock".to_string(),
                message: "Minimum stock cannot be negative".to_string(),
                message_id: "Stok minimum tidak boleh negatif".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let code = SequenceGenerator::next_item_code(&mut tx).await?;

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO items (code, name, unit_id, category_id, min_stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&code)
        .bind(name)
        .bind(input.unit_id)
        .bind(input.category_id)
        .bind(input.min_stock)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Update item master data
    pub async fn update_item(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        if let Some(min_stock) = input.min_stock {
            if min_stock < 0 {
                return Err(AppError::Validation {
                    field: "min_stock".to_string(),
                    message: "Minimum stock cannot be negative".to_string(),
                    message_id: "Stok minimum tidak boleh negatif".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE items
            SET name = COALESCE($1, name),
                unit_id = COALESCE($2, unit_id),
                category_id = COALESCE($3, category_id),
                min_stock = COALESCE($4, min_stock)
            WHERE id = $5
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.unit_id)
        .bind(input.category_id)
        .bind(input.min_stock)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }

    /// Delete an item. Items referenced by transactions or movements are
    /// protected by foreign keys and surface as a conflict.
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                    AppError::Conflict {
                        resource: "item".to_string(),
                        message: "Item is referenced by transactions and cannot be deleted"
                            .to_string(),
                        message_id: "Bahan baku dipakai oleh transaksi dan tidak dapat dihapus"
                            .to_string(),
                    }
                }
                _ => AppError::DatabaseError(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item".to_string()));
        }

        Ok(())
    }

    /// Get an item by ID
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<Item> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {} FROM items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }

    /// List all items ordered by code
    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {} FROM items ORDER BY code",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Items at or below their minimum stock, computed live from the
    /// ledger-maintained quantities
    pub async fn low_stock_items(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {} FROM items WHERE stock_quantity <= min_stock ORDER BY code",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Snapshot of the referenced items for the transaction validator
    pub async fn catalog_for(&self, item_ids: &[Uuid]) -> AppResult<ItemCatalog> {
        let rows = sqlx::query_as::<_, (Uuid, String, i32)>(
            "SELECT id, name, stock_quantity FROM items WHERE id = ANY($1)",
        )
        .bind(item_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, stock_quantity)| {
                (
                    id,
                    ItemSnapshot {
                        id,
                        name,
                        stock_quantity,
                    },
                )
            })
            .collect())
    }
}
