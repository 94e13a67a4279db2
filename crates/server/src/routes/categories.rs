//! Category facet route handlers.
//!
//! Categories are implicit: the facet list is derived from the values in
//! use, in first-seen order over the newest-first product listing. A
//! category whose last product is deleted simply disappears.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use makhzan_core::catalog;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// One category facet: its value and the number of products carrying it.
#[derive(Debug, Serialize)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

/// List category facets with per-category product counts.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryFacet>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let facets = catalog::aggregate(&products);

    let body = facets
        .categories
        .iter()
        .map(|name| CategoryFacet {
            name: name.clone(),
            count: facets.counts.get(name).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(body))
}

/// Create the category routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list))
}
