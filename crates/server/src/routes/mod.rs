//! Route handlers.

use axum::Router;

use crate::state::AppState;

pub mod categories;
pub mod custom_fields;
pub mod image_search;
pub mod products;
pub mod qr;
pub mod scan;

/// Assemble all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(custom_fields::router())
        .merge(qr::router())
        .merge(scan::router())
        .merge(image_search::router())
}
