use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{duplicate_skill, Store};
use crate::errors::AppError;
use crate::models::resume::{DerivedFields, ResumeRow};
use crate::models::skill::SkillRow;
use crate::models::user::User;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(
            "SELECT id, username, email, full_name, phone, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(username) = lower($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        let skills = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM skills WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    async fn get_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<Option<SkillRow>, AppError> {
        let skill = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM skills WHERE id = $1 AND user_id = $2",
        )
        .bind(skill_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(skill)
    }

    async fn create_skill(&self, user_id: Uuid, name: &str) -> Result<SkillRow, AppError> {
        let skill = sqlx::query_as(
            r#"
            INSERT INTO skills (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_skill(name)
            } else {
                AppError::Database(e)
            }
        })?;
        Ok(skill)
    }

    async fn rename_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        name: &str,
    ) -> Result<Option<SkillRow>, AppError> {
        let skill = sqlx::query_as(
            r#"
            UPDATE skills SET name = $1
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(name)
        .bind(skill_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_skill(name)
            } else {
                AppError::Database(e)
            }
        })?;
        Ok(skill)
    }

    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND user_id = $2")
            .bind(skill_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_resume(&self, user_id: Uuid, file_path: &str) -> Result<ResumeRow, AppError> {
        let resume: ResumeRow = sqlx::query_as(
            r#"
            INSERT INTO resumes (user_id, file_path)
            VALUES ($1, $2)
            RETURNING id, user_id, file_path, uploaded_at, name, email, skills, ats_score
            "#,
        )
        .bind(user_id)
        .bind(file_path)
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {user_id}", resume.id);
        Ok(resume)
    }

    async fn update_resume_fields(
        &self,
        resume_id: Uuid,
        fields: &DerivedFields,
    ) -> Result<ResumeRow, AppError> {
        let resume: Option<ResumeRow> = sqlx::query_as(
            r#"
            UPDATE resumes
            SET name = $1, email = $2, skills = $3, ats_score = $4
            WHERE id = $5
            RETURNING id, user_id, file_path, uploaded_at, name, email, skills, ats_score
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.skills)
        .bind(i32::from(fields.ats_score))
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;

        resume.ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
    }

    async fn get_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let resume = sqlx::query_as(
            r#"
            SELECT id, user_id, file_path, uploaded_at, name, email, skills, ats_score
            FROM resumes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resume)
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let resumes = sqlx::query_as(
            r#"
            SELECT id, user_id, file_path, uploaded_at, name, email, skills, ats_score
            FROM resumes
            WHERE user_id = $1
            ORDER BY uploaded_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }
}
