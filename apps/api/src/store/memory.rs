use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{duplicate_skill, Store};
use crate::errors::AppError;
use crate::models::resume::{DerivedFields, ResumeRow};
use crate::models::skill::SkillRow;
use crate::models::user::User;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    skills: Vec<SkillRow>,
    resumes: Vec<ResumeRow>,
}

/// In-memory `Store` with the same ordering and uniqueness rules as the
/// Postgres schema. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users come from the account service; this seeds one directly.
    pub async fn insert_user(&self, username: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: String::new(),
            phone: String::new(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.users.push(user.clone());
        user
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let needle = username.to_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.username.to_lowercase() == needle))
    }

    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .skills
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<Option<SkillRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .skills
            .iter()
            .find(|s| s.id == skill_id && s.user_id == user_id)
            .cloned())
    }

    async fn create_skill(&self, user_id: Uuid, name: &str) -> Result<SkillRow, AppError> {
        let mut tables = self.tables.lock().await;
        if tables
            .skills
            .iter()
            .any(|s| s.user_id == user_id && s.name == name)
        {
            return Err(duplicate_skill(name));
        }
        let skill = SkillRow {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.skills.push(skill.clone());
        Ok(skill)
    }

    async fn rename_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        name: &str,
    ) -> Result<Option<SkillRow>, AppError> {
        let mut tables = self.tables.lock().await;
        if tables
            .skills
            .iter()
            .any(|s| s.user_id == user_id && s.id != skill_id && s.name == name)
        {
            return Err(duplicate_skill(name));
        }
        Ok(tables
            .skills
            .iter_mut()
            .find(|s| s.id == skill_id && s.user_id == user_id)
            .map(|s| {
                s.name = name.to_string();
                s.clone()
            }))
    }

    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().await;
        let before = tables.skills.len();
        tables
            .skills
            .retain(|s| !(s.id == skill_id && s.user_id == user_id));
        Ok(tables.skills.len() < before)
    }

    async fn create_resume(&self, user_id: Uuid, file_path: &str) -> Result<ResumeRow, AppError> {
        let resume = ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            file_path: file_path.to_string(),
            uploaded_at: Utc::now(),
            name: String::new(),
            email: String::new(),
            skills: String::new(),
            ats_score: 0,
        };
        self.tables.lock().await.resumes.push(resume.clone());
        Ok(resume)
    }

    async fn update_resume_fields(
        &self,
        resume_id: Uuid,
        fields: &DerivedFields,
    ) -> Result<ResumeRow, AppError> {
        let mut tables = self.tables.lock().await;
        let resume = tables
            .resumes
            .iter_mut()
            .find(|r| r.id == resume_id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
        resume.name = fields.name.clone();
        resume.email = fields.email.clone();
        resume.skills = fields.skills.clone();
        resume.ats_score = i32::from(fields.ats_score);
        Ok(resume.clone())
    }

    async fn get_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .resumes
            .iter()
            .find(|r| r.id == resume_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let tables = self.tables.lock().await;
        let mut resumes: Vec<ResumeRow> = tables
            .resumes
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(resumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skill_names_are_unique_per_user() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice", "alice@example.com").await;
        let bob = store.insert_user("bob", "bob@example.com").await;

        store.create_skill(alice.id, "Rust").await.unwrap();
        let err = store.create_skill(alice.id, "Rust").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Case-sensitive, and scoped per user.
        store.create_skill(alice.id, "rust").await.unwrap();
        store.create_skill(bob.id, "Rust").await.unwrap();
    }

    #[tokio::test]
    async fn test_skills_are_listed_in_creation_order() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice", "alice@example.com").await;
        for name in ["Python", "SQL", "Go"] {
            store.create_skill(user.id, name).await.unwrap();
        }
        let names: Vec<String> = store
            .list_skills(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Python", "SQL", "Go"]);
    }

    #[tokio::test]
    async fn test_rename_and_delete_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice", "alice@example.com").await;
        let bob = store.insert_user("bob", "bob@example.com").await;
        let skill = store.create_skill(alice.id, "Rust").await.unwrap();

        assert!(store.rename_skill(bob.id, skill.id, "Go").await.unwrap().is_none());
        assert!(!store.delete_skill(bob.id, skill.id).await.unwrap());

        let renamed = store
            .rename_skill(alice.id, skill.id, "Go")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Go");
        // Renaming to its own current name is not a conflict.
        assert!(store.rename_skill(alice.id, skill.id, "Go").await.unwrap().is_some());
        assert!(store.delete_skill(alice.id, skill.id).await.unwrap());
        assert!(store.get_skill(alice.id, skill.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resume_starts_empty_and_is_updated_once() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice", "alice@example.com").await;
        let resume = store.create_resume(user.id, "media/resumes/cv.pdf").await.unwrap();
        assert_eq!(resume.name, "");
        assert_eq!(resume.ats_score, 0);

        let fields = DerivedFields {
            name: "Alice Liddell".to_string(),
            email: "alice@example.com".to_string(),
            skills: "Rust".to_string(),
            ats_score: 100,
        };
        let updated = store.update_resume_fields(resume.id, &fields).await.unwrap();
        assert_eq!(updated.name, "Alice Liddell");
        assert_eq!(updated.ats_score, 100);
        assert_eq!(updated.uploaded_at, resume.uploaded_at);
    }

    #[tokio::test]
    async fn test_username_lookup_ignores_case() {
        let store = MemoryStore::new();
        store.insert_user("Alice", "alice@example.com").await;
        assert!(store.username_exists("alice").await.unwrap());
        assert!(store.username_exists("ALICE").await.unwrap());
        assert!(!store.username_exists("bob").await.unwrap());
    }
}
