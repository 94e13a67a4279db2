//! Scan route handlers: still-image decode and payload resolution.
//!
//! Both outcomes short of a server fault are reported as structured
//! 200-responses: a decode failure ("no valid code found") and a
//! resolution miss ("no matching product") are recoverable conditions the
//! client presents to the user, not errors that abort anything.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use serde::{Deserialize, Serialize};

use makhzan_core::{Product, resolve::resolve, scan::scan_still};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Outcome of a scan request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The payload resolved to a product.
    Found { product: Product },
    /// The image held no decodable QR code.
    NoCode { message: String },
    /// The payload decoded but matched no product.
    NoMatch { payload: String, message: String },
}

/// Request body for client-side decoded payloads (live camera scans).
#[derive(Debug, Deserialize)]
pub struct PayloadBody {
    pub payload: String,
}

async fn resolve_payload(state: &AppState, payload: String) -> Result<ScanOutcome> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(match resolve(&payload, &products) {
        Some(product) => ScanOutcome::Found {
            product: product.clone(),
        },
        None => ScanOutcome::NoMatch {
            payload,
            message: "no matching product".to_string(),
        },
    })
}

/// Decode an uploaded still image (camera snapshot or file) and resolve
/// the payload. Exactly one decode attempt is made.
pub async fn scan_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanOutcome>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("no image uploaded".to_string()))?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

    match scan_still(&bytes) {
        Ok(payload) => {
            tracing::debug!(%payload, "decoded QR payload from upload");
            Ok(Json(resolve_payload(&state, payload).await?))
        }
        Err(err) => {
            tracing::debug!(error = %err, "still-image decode failed");
            Ok(Json(ScanOutcome::NoCode {
                message: "no valid code found in image".to_string(),
            }))
        }
    }
}

/// Resolve a payload the client already decoded from its live camera.
pub async fn scan_payload(
    State(state): State<AppState>,
    Json(body): Json<PayloadBody>,
) -> Result<Json<ScanOutcome>> {
    Ok(Json(resolve_payload(&state, body.payload).await?))
}

/// Create the scan routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan/image", post(scan_image))
        .route("/scan/payload", post(scan_payload))
}
