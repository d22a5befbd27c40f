//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Role, StudentSummary, User};

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, bio, video_url, created_at, updated_at";

fn map_user(row: &PgRow) -> Result<User> {
    let role: String = row.get("role");
    let role = role
        .parse::<Role>()
        .map_err(|e| anyhow::anyhow!("Invalid role in database: {}", e))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        role,
        bio: row.get("bio"),
        video_url: row.get("video_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a plaintext password with argon2
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a user's password against the stored hash
    pub fn verify_password(user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Create a new student account
    pub async fn create_student(&self, name: &str, email: &str, password: &str) -> Result<User> {
        info!("Creating new student: {}", email);

        let password_hash = Self::hash_password(password)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, role)
            VALUES ($1, $2, $3, 'STUDENT')
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by ID, constrained to role STUDENT
    pub async fn find_student(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = 'STUDENT'",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find the teacher account
    pub async fn find_teacher(&self) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'TEACHER' LIMIT 1",
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Check whether an email belongs to a different user
    pub async fn email_in_use_by_other(&self, email: &str, user_id: Uuid) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// How many of the given ids exist with role STUDENT
    pub async fn count_students(&self, ids: &[Uuid]) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE id = ANY($1) AND role = 'STUDENT'",
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// All students ordered by name, with assignment and class counts
    pub async fn list_students(&self) -> Result<Vec<StudentSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.created_at,
                   (SELECT COUNT(*) FROM student_exercises se WHERE se.student_id = u.id) AS exercise_count,
                   (SELECT COUNT(*) FROM scheduled_classes sc WHERE sc.student_id = u.id) AS class_count
            FROM users u
            WHERE u.role = 'STUDENT'
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let students = rows
            .into_iter()
            .map(|row| StudentSummary {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                created_at: row.get("created_at"),
                exercise_count: row.get("exercise_count"),
                class_count: row.get("class_count"),
            })
            .collect();

        Ok(students)
    }

    /// Partially update a student's name and email
    pub async fn update_student(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Partially update the caller's own profile. `bio`/`video_url` are
    /// three-state: skipped when unset, cleared when the flag is set with
    /// a NULL value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        set_bio: bool,
        bio: Option<&str>,
        set_video_url: bool,
        video_url: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = CASE WHEN $3 THEN $4 ELSE bio END,
                video_url = CASE WHEN $5 THEN $6 ELSE video_url END,
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(set_bio)
        .bind(bio)
        .bind(set_video_url)
        .bind(video_url)
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Replace a user's password hash
    pub async fn update_password(&self, id: Uuid, password: &str) -> Result<()> {
        let password_hash = Self::hash_password(password)?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(&password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a user; assignments and classes cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_hash(hash: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "s@example.com".to_string(),
            password_hash: hash.to_string(),
            name: "Student".to_string(),
            role: Role::Student,
            bio: None,
            video_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let hash = UserRepository::hash_password("correct horse").unwrap();
        let user = user_with_hash(&hash);

        assert!(UserRepository::verify_password(&user, "correct horse").unwrap());
        assert!(!UserRepository::verify_password(&user, "wrong").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = UserRepository::hash_password("same input").unwrap();
        let second = UserRepository::hash_password("same input").unwrap();
        assert_ne!(first, second);
    }
}
