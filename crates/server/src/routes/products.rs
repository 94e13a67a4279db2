//! Product route handlers.
//!
//! Listing applies the catalog filter engine: `q` is a case-insensitive
//! substring search across name, category, reference code and custom
//! fields, and `category` restricts to an exact facet value. Both are
//! optional and combine with AND.

use std::collections::HashMap;

use axum::{
    Json,
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use makhzan_core::{CustomField, Product, ProductId, ProductImages, catalog, validate_value};

use crate::db::products::{NewProduct, ProductRepository};
use crate::db::CustomFieldRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Free-text search term.
    pub q: Option<String>,
    /// Category facet restriction (exact value from the facet list).
    pub category: Option<String>,
}

/// Request body for create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub reference_id: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub images: ProductImages,
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
}

impl ProductPayload {
    /// Entry-form validation: required base fields plus the submitted
    /// custom-field values checked against the current definitions.
    /// Existing products are never re-validated.
    fn validate(&self, definitions: &[CustomField]) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::BadRequest(
                "category must not be empty".to_string(),
            ));
        }

        for field in definitions {
            let value = self.custom_fields.get(&field.name).map(String::as_str);
            validate_value(field, value).map_err(|e| AppError::BadRequest(e.to_string()))?;
        }

        Ok(())
    }

    fn into_new_product(self) -> NewProduct {
        NewProduct {
            reference_id: self
                .reference_id
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            images: self.images,
            custom_fields: self.custom_fields,
        }
    }
}

/// List products, optionally filtered by search term and category facet.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    let visible = catalog::filter(
        &products,
        query.q.as_deref().unwrap_or(""),
        query.category.as_deref(),
    );

    Ok(Json(visible.into_iter().cloned().collect()))
}

/// Get one product by ID.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let definitions = CustomFieldRepository::new(state.pool()).list().await?;
    payload.validate(&definitions)?;

    let product = ProductRepository::new(state.pool())
        .create(&payload.into_new_product())
        .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's mutable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let definitions = CustomFieldRepository::new(state.pool()).list().await?;
    payload.validate(&definitions)?;

    let product = ProductRepository::new(state.pool())
        .update(id, &payload.into_new_product())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    tracing::info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

/// Delete a product.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Create the product routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).put(update).delete(remove))
}
