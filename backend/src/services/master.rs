//! Master data service: units, categories, suppliers
//!
//! Plain lookup tables with unique names; no lifecycle beyond CRUD.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{map_unique_violation, AppError, AppResult};
use shared::models::{Category, Supplier, Unit};

/// Master data service
#[derive(Clone)]
pub struct MasterDataService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct UnitInput {
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, FromRow)]
struct UnitRow {
    id: Uuid,
    name: String,
    abbreviation: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UnitRow> for Unit {
    fn from(r: UnitRow) -> Self {
        Unit {
            id: r.id,
            name: r.name,
            abbreviation: r.abbreviation,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<SupplierRow> for Supplier {
    fn from(r: SupplierRow) -> Self {
        Supplier {
            id: r.id,
            name: r.name,
            phone: r.phone,
            address: r.address,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn require_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Name must not be empty".to_string(),
            message_id: "Nama tidak boleh kosong".to_string(),
        });
    }
    Ok(trimmed)
}

fn map_reference_delete_error(e: sqlx::Error, resource: &str, message_id: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            AppError::Conflict {
                resource: resource.to_string(),
                message: format!("{} is still referenced and cannot be deleted", resource),
                message_id: message_id.to_string(),
            }
        }
        _ => AppError::DatabaseError(e),
    }
}

impl MasterDataService {
    /// Create a new MasterDataService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    pub async fn create_unit(&self, input: UnitInput) -> AppResult<Unit> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, UnitRow>(
            r#"
            INSERT INTO units (name, abbreviation)
            VALUES ($1, $2)
            RETURNING id, name, abbreviation, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(input.abbreviation.trim())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        Ok(row.into())
    }

    pub async fn update_unit(&self, unit_id: Uuid, input: UnitInput) -> AppResult<Unit> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, UnitRow>(
            r#"
            UPDATE units SET name = $1, abbreviation = $2
            WHERE id = $3
            RETURNING id, name, abbreviation, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(input.abbreviation.trim())
        .bind(unit_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?
        .ok_or_else(|| AppError::NotFound("Unit".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete_unit(&self, unit_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(unit_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_reference_delete_error(e, "unit", "Satuan masih dipakai dan tidak dapat dihapus")
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Unit".to_string()));
        }
        Ok(())
    }

    pub async fn list_units(&self) -> AppResult<Vec<Unit>> {
        let rows = sqlx::query_as::<_, UnitRow>(
            "SELECT id, name, abbreviation, created_at, updated_at FROM units ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        Ok(row.into())
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Category> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete_category(&self, category_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_reference_delete_error(
                    e,
                    "category",
                    "Kategori masih dipakai dan tidak dapat dihapus",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }
        Ok(())
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    // ------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------

    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, phone, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, address, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        Ok(row.into())
    }

    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: SupplierInput,
    ) -> AppResult<Supplier> {
        let name = require_name(&input.name)?;
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers SET name = $1, phone = $2, address = $3
            WHERE id = $4
            RETURNING id, name, phone, address, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    pub async fn delete_supplier(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_reference_delete_error(
                    e,
                    "supplier",
                    "Supplier masih dipakai dan tidak dapat dihapus",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        Ok(())
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, phone, address, created_at, updated_at FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Supplier::from).collect())
    }
}
