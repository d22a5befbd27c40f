//! Exercise models and assignment payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exercise entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub audio_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exercise with the number of students it is assigned to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithCount {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub assigned_count: i64,
}

/// Request for creating an exercise
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub audio_key: String,
}

/// Partial exercise update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub audio_url: Option<String>,
    pub audio_key: Option<String>,
}

/// Trimmed exercise embedded in assignment listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

/// One assignment row with its exercise, as seen from a student
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithExercise {
    pub id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub exercise: ExerciseSummary,
}

/// One assignment row with its student, as seen from an exercise
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Students currently assigned to an exercise
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAssignments {
    pub exercise_id: Uuid,
    pub assigned_students: Vec<AssignedStudent>,
}

/// Request assigning an exercise to a set of students
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStudentsRequest {
    pub student_ids: Vec<Uuid>,
}

/// Request removing one student's assignment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignRequest {
    pub student_id: Uuid,
}

/// Desired full assignment set for a student
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub exercise_ids: Vec<Uuid>,
}

/// Outcome of a reconciliation: how many assignments changed
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub added: usize,
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_body_uses_camel_case() {
        let exercise = Exercise {
            id: Uuid::nil(),
            title: "Scales".to_string(),
            description: None,
            audio_url: "https://blob/scales.mp3".to_string(),
            audio_key: "exercises/1-scales.mp3".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&exercise).unwrap();
        assert!(value.get("audioUrl").is_some());
        assert!(value.get("audioKey").is_some());
        assert!(value.get("audio_url").is_none());
    }

    #[test]
    fn with_count_flattens_exercise_fields() {
        let with_count = ExerciseWithCount {
            exercise: Exercise {
                id: Uuid::nil(),
                title: "Arpeggios".to_string(),
                description: Some("daily".to_string()),
                audio_url: "https://blob/a.mp3".to_string(),
                audio_key: "exercises/2-a.mp3".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            assigned_count: 3,
        };

        let value = serde_json::to_value(&with_count).unwrap();
        assert_eq!(value["title"], "Arpeggios");
        assert_eq!(value["assignedCount"], 3);
    }

    #[test]
    fn reconcile_request_accepts_camel_case_ids() {
        let body = r#"{"exerciseIds":["00000000-0000-0000-0000-000000000000"]}"#;
        let request: ReconcileRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.exercise_ids.len(), 1);
    }
}
