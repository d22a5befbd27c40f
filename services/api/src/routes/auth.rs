//! Registration and login handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::ApiError,
    models::{LoginRequest, RegisterRequest, TokenResponse},
    repositories::UserRepository,
    state::AppState,
    validation,
};

/// Self-registration; always creates a STUDENT account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let exists = state
        .user_repository
        .email_exists(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to check email: {}", e);
            ApiError::InternalServerError
        })?;

    if exists {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user = state
        .user_repository
        .create_student(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Registered new student {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created successfully",
            "userId": user.id,
        })),
    ))
}

/// Email/password login returning a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let valid = UserRepository::verify_password(&user, &payload.password).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;

    if !valid {
        return Err(ApiError::Unauthorized);
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, user.role)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    let response = TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    };

    Ok((StatusCode::OK, Json(response)))
}
