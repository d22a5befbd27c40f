//! Site settings handlers
//!
//! The read is public (the landing page shows pricing before login);
//! writes are teacher only.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::UpdateSettingsRequest,
    state::AppState,
    validation,
};

/// Fetch the settings singleton, creating it on first access
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state
        .settings_repository
        .get_or_create()
        .await
        .map_err(|e| {
            error!("Failed to fetch settings: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(settings))
}

/// Partially update the settings singleton
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if let Some(name) = &payload.teacher_name {
        if name.len() > 100 {
            return Err(ApiError::BadRequest("Name is too long".to_string()));
        }
    }
    if let Some(bio) = &payload.teacher_bio {
        if bio.len() > 5000 {
            return Err(ApiError::BadRequest("Bio is too long".to_string()));
        }
    }
    if let Some(photo) = &payload.teacher_photo {
        if !photo.is_empty() {
            validation::validate_url(photo, "Photo URL").map_err(ApiError::BadRequest)?;
        }
    }
    if let Some(pricing) = &payload.pricing {
        validation::validate_pricing(pricing).map_err(ApiError::BadRequest)?;
    }
    if let Some(contact) = &payload.contact_info {
        validation::validate_contact_info(contact).map_err(ApiError::BadRequest)?;
    }

    let pricing = payload
        .pricing
        .as_ref()
        .map(|items| serde_json::to_value(items))
        .transpose()
        .map_err(|e| {
            error!("Failed to serialize pricing: {}", e);
            ApiError::InternalServerError
        })?;

    let contact_info = payload
        .contact_info
        .as_ref()
        .map(|contact| serde_json::to_value(contact))
        .transpose()
        .map_err(|e| {
            error!("Failed to serialize contact info: {}", e);
            ApiError::InternalServerError
        })?;

    // Empty teacherPhoto clears the stored value.
    let set_photo = payload.teacher_photo.is_some();
    let photo = payload.teacher_photo.as_deref().filter(|p| !p.is_empty());

    let settings = state
        .settings_repository
        .update(
            payload.teacher_name.is_some(),
            payload.teacher_name.as_deref(),
            payload.teacher_bio.is_some(),
            payload.teacher_bio.as_deref(),
            set_photo,
            photo,
            pricing,
            contact_info,
        )
        .await
        .map_err(|e| {
            error!("Failed to update settings: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(settings))
}
