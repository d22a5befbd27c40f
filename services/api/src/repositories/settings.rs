//! Site settings repository
//!
//! The settings table is a constraint-enforced singleton. Reads lazily
//! create the row; the insert is conflict-safe so concurrent cold starts
//! cannot persist a second row.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::SiteSettings;

const SETTINGS_COLUMNS: &str =
    "id, teacher_name, teacher_bio, teacher_photo, pricing, contact_info, created_at, updated_at";

fn map_settings(row: &PgRow) -> SiteSettings {
    SiteSettings {
        id: row.get("id"),
        teacher_name: row.get("teacher_name"),
        teacher_bio: row.get("teacher_bio"),
        teacher_photo: row.get("teacher_photo"),
        pricing: row.get("pricing"),
        contact_info: row.get("contact_info"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row, creating it with empty defaults on first access
    pub async fn get_or_create(&self) -> Result<SiteSettings> {
        sqlx::query("INSERT INTO site_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .execute(&self.pool)
            .await?;

        let row = sqlx::query(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE id = 1",
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(map_settings(&row))
    }

    /// Apply a partial update. Each field is three-state via its set flag:
    /// skipped, set, or cleared with a NULL value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        set_name: bool,
        teacher_name: Option<&str>,
        set_bio: bool,
        teacher_bio: Option<&str>,
        set_photo: bool,
        teacher_photo: Option<&str>,
        pricing: Option<serde_json::Value>,
        contact_info: Option<serde_json::Value>,
    ) -> Result<SiteSettings> {
        // Ensure the singleton exists so a cold-start PUT succeeds.
        self.get_or_create().await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE site_settings
            SET teacher_name = CASE WHEN $1 THEN $2 ELSE teacher_name END,
                teacher_bio = CASE WHEN $3 THEN $4 ELSE teacher_bio END,
                teacher_photo = CASE WHEN $5 THEN $6 ELSE teacher_photo END,
                pricing = COALESCE($7, pricing),
                contact_info = COALESCE($8, contact_info),
                updated_at = now()
            WHERE id = 1
            RETURNING {SETTINGS_COLUMNS}
            "#,
        ))
        .bind(set_name)
        .bind(teacher_name)
        .bind(set_bio)
        .bind(teacher_bio)
        .bind(set_photo)
        .bind(teacher_photo)
        .bind(pricing)
        .bind(contact_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_settings(&row))
    }
}
