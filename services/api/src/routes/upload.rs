//! Audio upload handlers (teacher only)

use axum::{
    Extension, Json,
    extract::{Multipart, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    state::AppState,
    storage::object_key,
};

/// Accepted audio content types: MP3, WAV, M4A, OGG
const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/mp4",
    "audio/x-m4a",
    "audio/ogg",
];

/// Maximum upload size: 50MB
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct DeleteUploadQuery {
    pub key: String,
}

/// Upload an audio file to blob storage and return its URL and key
pub async fn upload_audio(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest("Invalid multipart body".to_string())
    })? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("audio").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                error!("Failed to read file bytes: {}", e);
                ApiError::BadRequest("Failed to read file".to_string())
            })?;
            file = Some((file_name, content_type, bytes));
            break;
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    if !ALLOWED_AUDIO_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::BadRequest(
            "Invalid file type. Allowed types: MP3, WAV, M4A, OGG".to_string(),
        ));
    }

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::BadRequest(
            "File too large. Maximum size is 50MB".to_string(),
        ));
    }

    let key = object_key(&file_name, Utc::now().timestamp_millis());
    let size = bytes.len();

    let url = state
        .storage
        .upload(&key, bytes.to_vec(), &content_type)
        .await
        .map_err(|e| {
            error!("Failed to upload file: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({
        "url": url,
        "key": key,
        "size": size,
        "contentType": content_type,
    })))
}

/// Delete an uploaded audio file by object key
pub async fn delete_audio(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DeleteUploadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_teacher()?;

    if query.key.is_empty() {
        return Err(ApiError::BadRequest("No key provided".to_string()));
    }

    state.storage.delete(&query.key).await.map_err(|e| {
        error!("Failed to delete file: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"success": true})))
}
