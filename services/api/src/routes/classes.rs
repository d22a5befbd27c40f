//! Scheduled class handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{
        ClassQuery, CreateClassRequest, PaymentStatus, PaymentStatusRequest, Role,
        UpdateClassRequest,
    },
    state::AppState,
    validation,
};

/// List classes. Students are always scoped to their own id; any
/// caller-supplied studentId filter is ignored for them.
pub async fn list_classes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ClassQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let student_filter = match user.role {
        Role::Student => Some(user.id),
        Role::Teacher => query.student_id,
    };

    let classes = state
        .class_repository
        .list(student_filter, query.start_date, query.end_date)
        .await
        .map_err(|e| {
            error!("Failed to list classes: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(classes))
}

/// Schedule a class
pub async fn create_class(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    validation::validate_title(&payload.title).map_err(ApiError::BadRequest)?;
    if let Some(notes) = &payload.notes {
        validation::validate_long_text(notes, "Notes").map_err(ApiError::BadRequest)?;
    }

    state
        .user_repository
        .find_student(payload.student_id)
        .await
        .map_err(|e| {
            error!("Failed to get student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    validation::validate_class_interval(payload.start_time, payload.end_time)
        .map_err(ApiError::BadRequest)?;

    let class = state
        .class_repository
        .create(
            payload.student_id,
            &payload.title,
            payload.start_time,
            payload.end_time,
            payload.notes.as_deref(),
            payload.payment_status.unwrap_or(PaymentStatus::Unpaid),
        )
        .await
        .map_err(|e| {
            error!("Failed to create class: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(class)))
}

/// Fetch one class; a student may only read their own
pub async fn get_class(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let class = state
        .class_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get class: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if user.role == Role::Student && class.student_id != user.id {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(class))
}

/// Partially update a class. The ordering invariant is re-checked against
/// the effective times, so supplying only one bound cannot invert the
/// interval.
pub async fn update_class(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if let Some(title) = &payload.title {
        validation::validate_title(title).map_err(ApiError::BadRequest)?;
    }
    if let Some(notes) = &payload.notes {
        validation::validate_long_text(notes, "Notes").map_err(ApiError::BadRequest)?;
    }

    let existing = state
        .class_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get class: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if let Some(student_id) = payload.student_id {
        if student_id != existing.student_id {
            state
                .user_repository
                .find_student(student_id)
                .await
                .map_err(|e| {
                    error!("Failed to get student: {}", e);
                    ApiError::InternalServerError
                })?
                .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;
        }
    }

    let (start_time, end_time) = validation::effective_class_interval(
        (existing.start_time, existing.end_time),
        payload.start_time,
        payload.end_time,
    )
    .map_err(ApiError::BadRequest)?;

    let set_notes = payload.notes.is_some();
    let class = state
        .class_repository
        .update(
            id,
            payload.student_id,
            payload.title.as_deref(),
            start_time,
            end_time,
            set_notes,
            payload.notes.as_deref(),
            payload.payment_status,
        )
        .await
        .map_err(|e| {
            error!("Failed to update class: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(class))
}

/// Narrow payment-status update, independent of the general update path
pub async fn update_payment_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    state
        .class_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get class: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    let class = state
        .class_repository
        .set_payment_status(id, payload.payment_status)
        .await
        .map_err(|e| {
            error!("Failed to update payment status: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(class))
}

/// Delete a class
pub async fn delete_class(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let deleted = state.class_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete class: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    Ok(Json(json!({"message": "Class deleted successfully"})))
}
