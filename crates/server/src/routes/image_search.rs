//! Image-search route handler.
//!
//! Placeholder collaborator: real image-content recognition is out of
//! scope, so the contract is "return some image-bearing product or none".
//! The uploaded image is accepted and discarded.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use serde::Serialize;

use makhzan_core::Product;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Outcome of an image search.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageSearchOutcome {
    Matched { product: Product },
    NoMatch { message: String },
}

/// Search for a product by uploaded image.
pub async fn search(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageSearchOutcome>> {
    // An image must be present even though its content is not inspected.
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("no image uploaded".to_string()))?;
    let _ = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

    let products = ProductRepository::new(state.pool()).list().await?;
    let matched = products.into_iter().find(|p| p.images.has_any());

    Ok(Json(match matched {
        Some(product) => ImageSearchOutcome::Matched { product },
        None => ImageSearchOutcome::NoMatch {
            message: "no product with images available".to_string(),
        },
    }))
}

/// Create the image-search routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/search/image", post(search))
}
