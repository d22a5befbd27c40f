//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::class::ClassSummary;
use crate::models::exercise::AssignmentWithExercise;

/// Authorization role, the sole authorization dimension in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "TEACHER")]
    Teacher,
    #[serde(rename = "STUDENT")]
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity as stored in the database. Never serialized to the API
/// directly; responses use the narrower types below.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub bio: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for self-registration (always creates a STUDENT)
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for a teacher creating a student account
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial update of a student's name/email
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One student row in the teacher's student list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub exercise_count: i64,
    pub class_count: i64,
}

/// Basic student response after create/update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full student detail with assignments and recent classes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_exercises: Vec<AssignmentWithExercise>,
    pub scheduled_classes: Vec<ClassSummary>,
    pub exercise_count: i64,
    pub class_count: i64,
}

/// Current user's own profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub video_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update. An empty string for bio/videoUrl clears the field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub video_url: Option<String>,
}

/// Request for changing the current user's password
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// The teacher's public profile shown to students
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub video_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("TEACHER".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!("STUDENT".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(Role::Teacher.as_str(), "TEACHER");
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
    }

    #[test]
    fn profile_response_uses_camel_case() {
        let profile = ProfileResponse {
            id: Uuid::nil(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            bio: None,
            video_url: Some("https://example.com/v".to_string()),
            role: Role::Teacher,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("videoUrl").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("video_url").is_none());
    }
}
