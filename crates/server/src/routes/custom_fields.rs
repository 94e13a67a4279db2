//! Custom-field definition route handlers.
//!
//! Mutations sit behind the static access code carried in the
//! `x-access-code` header. This backs the front-of-house confirmation
//! dialog in the UI; it is a gate, not authentication.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use makhzan_core::{CustomField, FieldId, FieldType};

use crate::config::ServerConfig;
use crate::db::custom_fields::{CustomFieldRepository, NewCustomField};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Header carrying the gate code for mutating requests.
const ACCESS_CODE_HEADER: &str = "x-access-code";

/// Request body for create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldPayload {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl CustomFieldPayload {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        if self.label.trim().is_empty() {
            return Err(AppError::BadRequest("label must not be empty".to_string()));
        }
        Ok(())
    }

    fn into_new_field(self) -> NewCustomField {
        NewCustomField {
            name: self.name.trim().to_string(),
            label: self.label.trim().to_string(),
            field_type: self.field_type,
            required: self.required,
            is_default: self.is_default,
        }
    }
}

/// Check the gate code on a mutating request.
fn require_access_code(headers: &HeaderMap, config: &ServerConfig) -> Result<()> {
    let presented = headers
        .get(ACCESS_CODE_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(code) if code == config.access_code => Ok(()),
        _ => Err(AppError::AccessCode),
    }
}

/// List custom-field definitions, oldest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomField>>> {
    let fields = CustomFieldRepository::new(state.pool()).list().await?;
    Ok(Json(fields))
}

/// Create a definition.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CustomFieldPayload>,
) -> Result<impl IntoResponse> {
    require_access_code(&headers, state.config())?;
    payload.validate()?;

    let field = CustomFieldRepository::new(state.pool())
        .create(&payload.into_new_field())
        .await?;

    tracing::info!(field_id = %field.id, "custom field created");
    Ok((StatusCode::CREATED, Json(field)))
}

/// Replace a definition's mutable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
    headers: HeaderMap,
    Json(payload): Json<CustomFieldPayload>,
) -> Result<Json<CustomField>> {
    require_access_code(&headers, state.config())?;
    payload.validate()?;

    let field = CustomFieldRepository::new(state.pool())
        .update(id, &payload.into_new_field())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("custom field {id}")))?;

    tracing::info!(field_id = %field.id, "custom field updated");
    Ok(Json(field))
}

/// Delete a definition. Product data keeps stale values under the old key.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_access_code(&headers, state.config())?;

    let deleted = CustomFieldRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("custom field {id}")));
    }

    tracing::info!(field_id = %id, "custom field deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Create the custom-field routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/custom-fields", get(list).post(create))
        .route("/custom-fields/{id}", axum::routing::put(update).delete(remove))
}
