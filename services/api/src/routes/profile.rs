//! Current-user profile handlers

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest, User},
    repositories::UserRepository,
    state::AppState,
    validation,
};

fn to_profile(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        bio: user.bio,
        video_url: user.video_url,
        role: user.role,
        created_at: user.created_at,
    }
}

/// The caller's own profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(|e| {
            error!("Failed to get profile: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(to_profile(profile)))
}

/// Partial profile update. An empty bio/videoUrl clears the field.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &payload.name {
        validation::validate_name(name).map_err(ApiError::BadRequest)?;
    }
    if let Some(bio) = &payload.bio {
        validation::validate_long_text(bio, "Bio").map_err(ApiError::BadRequest)?;
    }
    if let Some(video_url) = &payload.video_url {
        if !video_url.is_empty() {
            validation::validate_url(video_url, "Video URL").map_err(ApiError::BadRequest)?;
        }
    }

    let set_bio = payload.bio.is_some();
    let bio = payload.bio.as_deref().filter(|b| !b.is_empty());
    let set_video_url = payload.video_url.is_some();
    let video_url = payload.video_url.as_deref().filter(|v| !v.is_empty());

    let updated = state
        .user_repository
        .update_profile(
            user.id,
            payload.name.as_deref(),
            set_bio,
            bio,
            set_video_url,
            video_url,
        )
        .await
        .map_err(|e| {
            error!("Failed to update profile: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(to_profile(updated)))
}

/// Change the caller's password after verifying the current one
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.current_password.is_empty() {
        return Err(ApiError::BadRequest(
            "Current password is required".to_string(),
        ));
    }
    validation::validate_password(&payload.new_password).map_err(ApiError::BadRequest)?;
    if payload.new_password != payload.confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    let account = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid =
        UserRepository::verify_password(&account, &payload.current_password).map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !valid {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    state
        .user_repository
        .update_password(user.id, &payload.new_password)
        .await
        .map_err(|e| {
            error!("Failed to update password: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Password updated successfully"})))
}
