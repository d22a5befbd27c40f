//! Exercise repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Exercise, ExerciseWithCount};

const EXERCISE_COLUMNS: &str =
    "id, title, description, audio_url, audio_key, created_at, updated_at";

fn map_exercise(row: &PgRow) -> Exercise {
    Exercise {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        audio_url: row.get("audio_url"),
        audio_key: row.get("audio_key"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Exercise repository
#[derive(Clone)]
pub struct ExerciseRepository {
    pool: PgPool,
}

impl ExerciseRepository {
    /// Create a new exercise repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All exercises, newest first, with assigned-student counts
    pub async fn list_with_counts(&self) -> Result<Vec<ExerciseWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.title, e.description, e.audio_url, e.audio_key,
                   e.created_at, e.updated_at,
                   (SELECT COUNT(*) FROM student_exercises se WHERE se.exercise_id = e.id) AS assigned_count
            FROM exercises e
            ORDER BY e.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let exercises = rows
            .into_iter()
            .map(|row| ExerciseWithCount {
                assigned_count: row.get("assigned_count"),
                exercise: map_exercise(&row),
            })
            .collect();

        Ok(exercises)
    }

    /// Create a new exercise
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        audio_url: &str,
        audio_key: &str,
    ) -> Result<Exercise> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO exercises (title, description, audio_url, audio_key)
            VALUES ($1, $2, $3, $4)
            RETURNING {EXERCISE_COLUMNS}
            "#,
        ))
        .bind(title)
        .bind(description)
        .bind(audio_url)
        .bind(audio_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_exercise(&row))
    }

    /// Find an exercise by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Exercise>> {
        let row = sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_exercise))
    }

    /// Find an exercise only if it is assigned to the given student
    pub async fn find_assigned_to_student(
        &self,
        exercise_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Exercise>> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.title, e.description, e.audio_url, e.audio_key,
                   e.created_at, e.updated_at
            FROM exercises e
            JOIN student_exercises se ON se.exercise_id = e.id
            WHERE e.id = $1 AND se.student_id = $2
            "#,
        )
        .bind(exercise_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_exercise))
    }

    /// How many of the given ids reference existing exercises
    pub async fn count_by_ids(&self, ids: &[Uuid]) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Partially update an exercise
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        audio_url: Option<&str>,
        audio_key: Option<&str>,
    ) -> Result<Exercise> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE exercises
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                audio_url = COALESCE($4, audio_url),
                audio_key = COALESCE($5, audio_key),
                updated_at = now()
            WHERE id = $1
            RETURNING {EXERCISE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(audio_url)
        .bind(audio_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_exercise(&row))
    }

    /// Delete an exercise; assignments cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
