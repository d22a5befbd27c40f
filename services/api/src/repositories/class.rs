//! Scheduled class repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ClassSummary, PaymentStatus, ScheduledClass, StudentBrief};

const CLASS_SELECT: &str = r#"
    SELECT c.id, c.student_id, c.title, c.start_time, c.end_time,
           c.payment_status, c.notes, c.created_at, c.updated_at,
           u.name AS student_name, u.email AS student_email
    FROM scheduled_classes c
    JOIN users u ON u.id = c.student_id
"#;

fn map_class(row: &PgRow) -> Result<ScheduledClass> {
    let payment_status: String = row.get("payment_status");
    let payment_status = payment_status
        .parse::<PaymentStatus>()
        .map_err(|e| anyhow::anyhow!("Invalid payment status in database: {}", e))?;

    Ok(ScheduledClass {
        id: row.get("id"),
        student_id: row.get("student_id"),
        title: row.get("title"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        payment_status,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        student: StudentBrief {
            id: row.get("student_id"),
            name: row.get("student_name"),
            email: row.get("student_email"),
        },
    })
}

/// Scheduled class repository
#[derive(Clone)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    /// Create a new class repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List classes, optionally filtered by student and start-time range,
    /// ascending by start time
    pub async fn list(
        &self,
        student_id: Option<Uuid>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<ScheduledClass>> {
        let rows = sqlx::query(&format!(
            r#"
            {CLASS_SELECT}
            WHERE ($1::uuid IS NULL OR c.student_id = $1)
              AND ($2::timestamptz IS NULL OR c.start_time >= $2)
              AND ($3::timestamptz IS NULL OR c.start_time <= $3)
            ORDER BY c.start_time ASC
            "#,
        ))
        .bind(student_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_class).collect()
    }

    /// Find a class by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ScheduledClass>> {
        let row = sqlx::query(&format!("{CLASS_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_class).transpose()
    }

    /// Schedule a new class
    pub async fn create(
        &self,
        student_id: Uuid,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: Option<&str>,
        payment_status: PaymentStatus,
    ) -> Result<ScheduledClass> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO scheduled_classes (student_id, title, start_time, end_time, notes, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(student_id)
        .bind(title)
        .bind(start_time)
        .bind(end_time)
        .bind(notes)
        .bind(payment_status.as_str())
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .context("Scheduled class vanished after insert")
    }

    /// Update a class. Times are always written; the handler computes the
    /// effective values before calling. `set_notes` makes notes three-state
    /// (skip / set / clear).
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        student_id: Option<Uuid>,
        title: Option<&str>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        set_notes: bool,
        notes: Option<&str>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<ScheduledClass> {
        let updated: Uuid = sqlx::query_scalar(
            r#"
            UPDATE scheduled_classes
            SET student_id = COALESCE($2, student_id),
                title = COALESCE($3, title),
                start_time = $4,
                end_time = $5,
                notes = CASE WHEN $6 THEN $7 ELSE notes END,
                payment_status = COALESCE($8, payment_status),
                updated_at = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(student_id)
        .bind(title)
        .bind(start_time)
        .bind(end_time)
        .bind(set_notes)
        .bind(notes)
        .bind(payment_status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(updated)
            .await?
            .context("Scheduled class vanished after update")
    }

    /// Narrow update of the payment status only
    pub async fn set_payment_status(
        &self,
        id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<ScheduledClass> {
        sqlx::query(
            "UPDATE scheduled_classes SET payment_status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(payment_status.as_str())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .context("Scheduled class vanished after payment update")
    }

    /// Delete a class
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM scheduled_classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Most recent classes for a student, newest first
    pub async fn recent_for_student(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ClassSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, start_time, end_time, payment_status, notes
            FROM scheduled_classes
            WHERE student_id = $1
            ORDER BY start_time DESC
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let payment_status: String = row.get("payment_status");
                let payment_status = payment_status
                    .parse::<PaymentStatus>()
                    .map_err(|e| anyhow::anyhow!("Invalid payment status in database: {}", e))?;

                Ok(ClassSummary {
                    id: row.get("id"),
                    title: row.get("title"),
                    start_time: row.get("start_time"),
                    end_time: row.get("end_time"),
                    payment_status,
                    notes: row.get("notes"),
                })
            })
            .collect()
    }

    /// Total class count for a student
    pub async fn count_for_student(&self, student_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM scheduled_classes WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
