//! QR artifact route handlers.
//!
//! The payload is always the product `id` in canonical string form; the
//! reference code only lends its name to the download filename. The print
//! view is a self-contained document: the code is embedded as a data URI
//! so the page survives being saved or printed offline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use makhzan_core::{Product, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Printable QR document template.
#[derive(Template, WebTemplate)]
#[template(path = "qr_print.html")]
pub struct QrPrintTemplate {
    pub name: String,
    pub category: String,
    pub reference_id: Option<String>,
    /// Custom fields as label/value pairs, sorted by key for stable output.
    pub fields: Vec<(String, String)>,
    pub qr_data_uri: String,
}

async fn load_product(state: &AppState, id: ProductId) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// The filename stem for exported artifacts: the reference code when
/// present, the id otherwise.
fn filename_stem(product: &Product) -> String {
    product
        .reference_id
        .clone()
        .unwrap_or_else(|| product.id.to_string())
}

/// Serve the product's QR code as a downloadable PNG.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = load_product(&state, id).await?;

    let png = state
        .qr_png(&product.qr_payload())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"qr-{}.png\"",
        filename_stem(&product)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png.to_vec(),
    ))
}

/// Serve the self-contained printable QR document.
pub async fn print(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<QrPrintTemplate> {
    let product = load_product(&state, id).await?;

    let png = state
        .qr_png(&product.qr_payload())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut fields: Vec<(String, String)> = product
        .custom_fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    fields.sort();

    Ok(QrPrintTemplate {
        name: product.name,
        category: product.category,
        reference_id: product.reference_id,
        fields,
        qr_data_uri: format!("data:image/png;base64,{}", BASE64.encode(png.as_slice())),
    })
}

/// Create the QR artifact routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/{id}/qr.png", get(download))
        .route("/products/{id}/qr/print", get(print))
}
