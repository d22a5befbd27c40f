//! Authentication middleware for JWT token validation

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, models::Role, state::AppState};

/// Authenticated user information resolved once per request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Check that the caller is the teacher
    pub fn require_teacher(&self) -> Result<(), ApiError> {
        if self.role != Role::Teacher {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}

/// Authentication middleware
///
/// Extracts the bearer token, validates it, and inserts an [`AuthUser`]
/// into the request extensions for handlers to pick up.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    let user = AuthUser {
        id: claims.sub,
        role: claims.role,
    };

    req.extensions_mut().insert(user);

    let response = next.run(req).await;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_is_rejected_from_teacher_checks() {
        let student = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Student,
        };
        assert!(matches!(
            student.require_teacher(),
            Err(ApiError::Forbidden)
        ));

        let teacher = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Teacher,
        };
        assert!(teacher.require_teacher().is_ok());
    }
}
