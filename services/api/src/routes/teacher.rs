//! Teacher public profile handler

use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{error::ApiError, models::TeacherProfile, state::AppState};

/// The teacher's public profile, shown to any authenticated user
pub async fn get_teacher_profile(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let teacher = state
        .user_repository
        .find_teacher()
        .await
        .map_err(|e| {
            error!("Failed to get teacher: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Teacher not found".to_string()))?;

    Ok(Json(TeacherProfile {
        id: teacher.id,
        name: teacher.name,
        bio: teacher.bio,
        video_url: teacher.video_url,
    }))
}
