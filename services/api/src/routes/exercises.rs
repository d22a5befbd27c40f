//! Exercise handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
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
        AssignStudentsRequest, CreateExerciseRequest, ExerciseAssignments, Role, UnassignRequest,
        UpdateExerciseRequest,
    },
    state::AppState,
    validation,
};

/// List all exercises with assignment counts
pub async fn list_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let exercises = state
        .exercise_repository
        .list_with_counts()
        .await
        .map_err(|e| {
            error!("Failed to list exercises: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(exercises))
}

/// Create an exercise
pub async fn create_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    validation::validate_title(&payload.title).map_err(ApiError::BadRequest)?;
    if let Some(description) = &payload.description {
        validation::validate_long_text(description, "Description").map_err(ApiError::BadRequest)?;
    }
    validation::validate_url(&payload.audio_url, "Audio URL").map_err(ApiError::BadRequest)?;
    if payload.audio_key.is_empty() {
        return Err(ApiError::BadRequest("Audio key is required".to_string()));
    }

    let exercise = state
        .exercise_repository
        .create(
            &payload.title,
            payload.description.as_deref(),
            &payload.audio_url,
            &payload.audio_key,
        )
        .await
        .map_err(|e| {
            error!("Failed to create exercise: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Fetch one exercise. Teachers see any; a student only sees exercises
/// assigned to them, anything else reads as missing.
pub async fn get_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let exercise = match user.role {
        Role::Teacher => state.exercise_repository.find_by_id(id).await,
        Role::Student => {
            state
                .exercise_repository
                .find_assigned_to_student(id, user.id)
                .await
        }
    }
    .map_err(|e| {
        error!("Failed to get exercise: {}", e);
        ApiError::InternalServerError
    })?
    .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    Ok(Json(exercise))
}

/// Partially update an exercise
pub async fn update_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExerciseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if let Some(title) = &payload.title {
        validation::validate_title(title).map_err(ApiError::BadRequest)?;
    }
    if let Some(description) = &payload.description {
        validation::validate_long_text(description, "Description").map_err(ApiError::BadRequest)?;
    }
    if let Some(audio_url) = &payload.audio_url {
        validation::validate_url(audio_url, "Audio URL").map_err(ApiError::BadRequest)?;
    }
    if let Some(audio_key) = &payload.audio_key {
        if audio_key.is_empty() {
            return Err(ApiError::BadRequest("Audio key is required".to_string()));
        }
    }

    state
        .exercise_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get exercise: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    let exercise = state
        .exercise_repository
        .update(
            id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.audio_url.as_deref(),
            payload.audio_key.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to update exercise: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(exercise))
}

/// Delete an exercise; assignments cascade
pub async fn delete_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let deleted = state.exercise_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete exercise: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Exercise not found".to_string()));
    }

    Ok(Json(json!({"message": "Exercise deleted successfully"})))
}

/// Students currently assigned to an exercise
pub async fn get_assignments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    state
        .exercise_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get exercise: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    let assigned_students = state
        .assignment_repository
        .list_for_exercise(id)
        .await
        .map_err(|e| {
            error!("Failed to list assignments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ExerciseAssignments {
        exercise_id: id,
        assigned_students,
    }))
}

/// Assign an exercise to a set of students, skipping existing pairs
pub async fn assign_students(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignStudentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if payload.student_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one student is required".to_string(),
        ));
    }

    state
        .exercise_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get exercise: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    // All referenced ids must be existing students before anything is written.
    let found = state
        .user_repository
        .count_students(&payload.student_ids)
        .await
        .map_err(|e| {
            error!("Failed to check students: {}", e);
            ApiError::InternalServerError
        })?;

    if !validation::all_ids_found(&payload.student_ids, found) {
        return Err(ApiError::BadRequest(
            "One or more students not found".to_string(),
        ));
    }

    let count = state
        .assignment_repository
        .assign_students(id, &payload.student_ids)
        .await
        .map_err(|e| {
            error!("Failed to assign exercise: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({
        "message": format!("Exercise assigned to {} student(s)", count),
        "count": count,
    })))
}

/// Remove one student's assignment
pub async fn unassign_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UnassignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let removed = state
        .assignment_repository
        .remove(id, payload.student_id)
        .await
        .map_err(|e| {
            error!("Failed to remove assignment: {}", e);
            ApiError::InternalServerError
        })?;

    if !removed {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    Ok(Json(json!({"message": "Assignment removed successfully"})))
}
