//! Assignment repository: the student↔exercise join table

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{AssignedStudent, AssignmentWithExercise, ExerciseSummary};
use crate::reconcile;

/// Assignment repository
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assignments for a student with their exercises, newest first
    pub async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<AssignmentWithExercise>> {
        let rows = sqlx::query(
            r#"
            SELECT se.id, se.assigned_at, se.notes,
                   e.id AS exercise_id, e.title, e.description, e.audio_url, e.created_at
            FROM student_exercises se
            JOIN exercises e ON e.id = se.exercise_id
            WHERE se.student_id = $1
            ORDER BY se.assigned_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        let assignments = rows
            .into_iter()
            .map(|row| AssignmentWithExercise {
                id: row.get("id"),
                assigned_at: row.get("assigned_at"),
                notes: row.get("notes"),
                exercise: ExerciseSummary {
                    id: row.get("exercise_id"),
                    title: row.get("title"),
                    description: row.get("description"),
                    audio_url: row.get("audio_url"),
                    created_at: row.get("created_at"),
                },
            })
            .collect();

        Ok(assignments)
    }

    /// Students assigned to an exercise
    pub async fn list_for_exercise(&self, exercise_id: Uuid) -> Result<Vec<AssignedStudent>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, se.assigned_at, se.notes
            FROM student_exercises se
            JOIN users u ON u.id = se.student_id
            WHERE se.exercise_id = $1
            ORDER BY se.assigned_at DESC
            "#,
        )
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await?;

        let students = rows
            .into_iter()
            .map(|row| AssignedStudent {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                assigned_at: row.get("assigned_at"),
                notes: row.get("notes"),
            })
            .collect();

        Ok(students)
    }

    /// Exercise ids currently assigned to a student
    pub async fn exercise_ids_for_student(&self, student_id: Uuid) -> Result<Vec<Uuid>> {
        let ids =
            sqlx::query_scalar("SELECT exercise_id FROM student_exercises WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Assign an exercise to a set of students, skipping pairs that
    /// already exist. Returns the number of rows actually inserted.
    pub async fn assign_students(&self, exercise_id: Uuid, student_ids: &[Uuid]) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO student_exercises (student_id, exercise_id)
            SELECT UNNEST($1::uuid[]), $2
            ON CONFLICT (student_id, exercise_id) DO NOTHING
            "#,
        )
        .bind(student_ids)
        .bind(exercise_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove a single assignment
    pub async fn remove(&self, exercise_id: Uuid, student_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM student_exercises WHERE exercise_id = $1 AND student_id = $2",
        )
        .bind(exercise_id)
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reconcile a student's assignments against a desired exercise-id set.
    ///
    /// Removals and additions run inside one transaction; inserts skip
    /// duplicate pairs, so re-applying the same desired set changes nothing.
    /// Returns (added, removed).
    pub async fn reconcile_for_student(
        &self,
        student_id: Uuid,
        desired: &[Uuid],
    ) -> Result<(usize, usize)> {
        let mut tx = self.pool.begin().await?;

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT exercise_id FROM student_exercises WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(&mut *tx)
                .await?;

        let plan = reconcile::diff(&current, desired);

        if !plan.to_remove.is_empty() {
            sqlx::query(
                "DELETE FROM student_exercises WHERE student_id = $1 AND exercise_id = ANY($2)",
            )
            .bind(student_id)
            .bind(&plan.to_remove)
            .execute(&mut *tx)
            .await?;
        }

        if !plan.to_add.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO student_exercises (student_id, exercise_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT (student_id, exercise_id) DO NOTHING
                "#,
            )
            .bind(student_id)
            .bind(&plan.to_add)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Reconciled assignments for student {}: +{} -{}",
            student_id,
            plan.to_add.len(),
            plan.to_remove.len()
        );

        Ok((plan.to_add.len(), plan.to_remove.len()))
    }
}
