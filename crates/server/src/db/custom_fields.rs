//! Custom-field definition repository.
//!
//! Definitions are independent of products: deleting one has no cascading
//! effect on product data, which may keep stale keys. Listing order is
//! creation time ascending so the entry form renders fields in the order
//! they were defined.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use makhzan_core::{CustomField, FieldId, FieldType};

use super::RepositoryError;

/// Fields supplied by the caller when creating or replacing a definition.
#[derive(Debug, Clone)]
pub struct NewCustomField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub is_default: bool,
}

#[derive(sqlx::FromRow)]
struct CustomFieldRow {
    id: Uuid,
    name: String,
    label: String,
    field_type: String,
    required: bool,
    is_default: bool,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomFieldRow> for CustomField {
    type Error = RepositoryError;

    fn try_from(row: CustomFieldRow) -> Result<Self, Self::Error> {
        let field_type = FieldType::parse(&row.field_type).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid field type in database: {e}"))
        })?;

        Ok(Self {
            id: FieldId::new(row.id),
            name: row.name,
            label: row.label,
            field_type,
            required: row.required,
            is_default: row.is_default,
        })
    }
}

const FIELD_COLUMNS: &str = "id, name, label, field_type, required, is_default, created_at";

/// Repository for custom-field definition operations.
pub struct CustomFieldRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomFieldRepository<'a> {
    /// Create a new custom-field repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all definitions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for an unknown stored type tag.
    pub async fn list(&self) -> Result<Vec<CustomField>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomFieldRow>(&format!(
            "SELECT {FIELD_COLUMNS} FROM custom_fields ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CustomField::try_from).collect()
    }

    /// Insert a new definition. The database assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewCustomField) -> Result<CustomField, RepositoryError> {
        let row = sqlx::query_as::<_, CustomFieldRow>(&format!(
            "INSERT INTO custom_fields (name, label, field_type, required, is_default) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {FIELD_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.label)
        .bind(new.field_type.as_str())
        .bind(new.required)
        .bind(new.is_default)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace the mutable fields of a definition.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: FieldId,
        new: &NewCustomField,
    ) -> Result<Option<CustomField>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomFieldRow>(&format!(
            "UPDATE custom_fields \
             SET name = $2, label = $3, field_type = $4, required = $5, is_default = $6 \
             WHERE id = $1 \
             RETURNING {FIELD_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(&new.label)
        .bind(new.field_type.as_str())
        .bind(new.required)
        .bind(new.is_default)
        .fetch_optional(self.pool)
        .await?;

        row.map(CustomField::try_from).transpose()
    }

    /// Delete a definition. Existing product data keeps any values stored
    /// under the deleted key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: FieldId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
