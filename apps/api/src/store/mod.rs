//! Persistence port for users, skills and resumes.
//!
//! `AppState` holds an `Arc<dyn Store>`: `PgStore` in production,
//! `MemoryStore` in tests.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{DerivedFields, ResumeRow};
use crate::models::skill::SkillRow;
use crate::models::user::User;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Every skill and resume operation is scoped to the owning user; rows of
/// other users behave as if they did not exist.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Case-insensitive username lookup.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;

    /// The user's skills in creation order.
    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError>;

    async fn get_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<Option<SkillRow>, AppError>;

    /// Fails with `AppError::Conflict` if the user already has a skill of that name.
    async fn create_skill(&self, user_id: Uuid, name: &str) -> Result<SkillRow, AppError>;

    /// Fails with `AppError::Conflict` if the new name is taken. `None` if the
    /// skill does not exist.
    async fn rename_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        name: &str,
    ) -> Result<Option<SkillRow>, AppError>;

    /// Returns whether a skill was deleted.
    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError>;

    /// Creates a resume with only its owner and file set.
    async fn create_resume(&self, user_id: Uuid, file_path: &str) -> Result<ResumeRow, AppError>;

    /// Fills in the derived fields of an existing resume.
    async fn update_resume_fields(
        &self,
        resume_id: Uuid,
        fields: &DerivedFields,
    ) -> Result<ResumeRow, AppError>;

    async fn get_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError>;

    /// The user's resumes, newest first.
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError>;
}

pub(crate) fn duplicate_skill(name: &str) -> AppError {
    AppError::Conflict(format!("Skill '{name}' already exists"))
}
