//! Product repository for database operations.
//!
//! The database assigns `id` and `created_at`; everything else is
//! replaceable on update. Listing order is creation time descending, so
//! the newest product comes first, matching the in-memory prepend
//! behaviour the front end expects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use makhzan_core::{Product, ProductId, ProductImages};

use super::RepositoryError;

/// Fields supplied by the caller when creating or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub reference_id: Option<String>,
    pub name: String,
    pub category: String,
    pub images: ProductImages,
    pub custom_fields: HashMap<String, String>,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    reference_id: Option<String>,
    name: String,
    category: String,
    front_image: Option<String>,
    back_image: Option<String>,
    support_image: Option<String>,
    custom_fields: Json<HashMap<String, String>>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            reference_id: row.reference_id,
            name: row.name,
            category: row.category,
            images: ProductImages {
                front: row.front_image,
                back: row.back_image,
                support: row.support_image,
            },
            custom_fields: row.custom_fields.0,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, reference_id, name, category, front_image, back_image, \
                               support_image, custom_fields, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a new product. The database assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products \
             (reference_id, name, category, front_image, back_image, support_image, custom_fields) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.reference_id)
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.images.front)
        .bind(&new.images.back)
        .bind(&new.images.support)
        .bind(Json(&new.custom_fields))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace all mutable fields of a product. `id` and `created_at`
    /// stay untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        new: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products \
             SET reference_id = $2, name = $3, category = $4, front_image = $5, \
                 back_image = $6, support_image = $7, custom_fields = $8 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&new.reference_id)
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.images.front)
        .bind(&new.images.back)
        .bind(&new.images.support)
        .bind(Json(&new.custom_fields))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
