//! Student management handlers (teacher only, except a student reading
//! their own assignments)

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
        CreateStudentRequest, ReconcileRequest, ReconcileResponse, Role, StudentDetail,
        StudentResponse, UpdateStudentRequest,
    },
    state::AppState,
    validation,
};

/// List all students with assignment and class counts
pub async fn list_students(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let students = state.user_repository.list_students().await.map_err(|e| {
        error!("Failed to list students: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(students))
}

/// Create a student account
pub async fn create_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

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
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let student = state
        .user_repository
        .create_student(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to create student: {}", e);
            ApiError::InternalServerError
        })?;

    let response = StudentResponse {
        id: student.id,
        name: student.name,
        email: student.email,
        created_at: student.created_at,
        updated_at: student.updated_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Full student detail: assignments, recent classes, counts
pub async fn get_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let student = state
        .user_repository
        .find_student(id)
        .await
        .map_err(|e| {
            error!("Failed to get student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let assigned_exercises = state
        .assignment_repository
        .list_for_student(id)
        .await
        .map_err(|e| {
            error!("Failed to list assignments: {}", e);
            ApiError::InternalServerError
        })?;

    let scheduled_classes = state
        .class_repository
        .recent_for_student(id, 10)
        .await
        .map_err(|e| {
            error!("Failed to list classes: {}", e);
            ApiError::InternalServerError
        })?;

    let class_count = state
        .class_repository
        .count_for_student(id)
        .await
        .map_err(|e| {
            error!("Failed to count classes: {}", e);
            ApiError::InternalServerError
        })?;

    let detail = StudentDetail {
        id: student.id,
        name: student.name,
        email: student.email,
        created_at: student.created_at,
        updated_at: student.updated_at,
        exercise_count: assigned_exercises.len() as i64,
        assigned_exercises,
        scheduled_classes,
        class_count,
    };

    Ok(Json(detail))
}

/// Partially update a student's name or email
pub async fn update_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if let Some(name) = &payload.name {
        validation::validate_name(name).map_err(ApiError::BadRequest)?;
    }
    if let Some(email) = &payload.email {
        validation::validate_email(email).map_err(ApiError::BadRequest)?;
    }

    let existing = state
        .user_repository
        .find_student(id)
        .await
        .map_err(|e| {
            error!("Failed to get student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    if let Some(email) = &payload.email {
        if *email != existing.email {
            let taken = state
                .user_repository
                .email_in_use_by_other(email, id)
                .await
                .map_err(|e| {
                    error!("Failed to check email: {}", e);
                    ApiError::InternalServerError
                })?;

            if taken {
                return Err(ApiError::Conflict("Email already in use".to_string()));
            }
        }
    }

    let updated = state
        .user_repository
        .update_student(id, payload.name.as_deref(), payload.email.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to update student: {}", e);
            ApiError::InternalServerError
        })?;

    let response = StudentResponse {
        id: updated.id,
        name: updated.name,
        email: updated.email,
        created_at: updated.created_at,
        updated_at: updated.updated_at,
    };

    Ok(Json(response))
}

/// Delete a student; assignments and classes cascade
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    state
        .user_repository
        .find_student(id)
        .await
        .map_err(|e| {
            error!("Failed to get student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    state.user_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete student: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"success": true})))
}

/// Exercises assigned to a student; teachers see anyone, students only
/// themselves
pub async fn get_student_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if user.role == Role::Student && user.id != id {
        return Err(ApiError::Forbidden);
    }

    let assignments = state
        .assignment_repository
        .list_for_student(id)
        .await
        .map_err(|e| {
            error!("Failed to list assignments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(assignments))
}

/// Reconcile a student's assignments against the desired exercise set
pub async fn reconcile_student_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    state
        .user_repository
        .find_student(id)
        .await
        .map_err(|e| {
            error!("Failed to get student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    // All desired exercises must exist before anything is written.
    if !payload.exercise_ids.is_empty() {
        let found = state
            .exercise_repository
            .count_by_ids(&payload.exercise_ids)
            .await
            .map_err(|e| {
                error!("Failed to check exercises: {}", e);
                ApiError::InternalServerError
            })?;

        if !validation::all_ids_found(&payload.exercise_ids, found) {
            return Err(ApiError::BadRequest(
                "One or more exercises not found".to_string(),
            ));
        }
    }

    let (added, removed) = state
        .assignment_repository
        .reconcile_for_student(id, &payload.exercise_ids)
        .await
        .map_err(|e| {
            error!("Failed to reconcile assignments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ReconcileResponse {
        success: true,
        added,
        removed,
    }))
}
