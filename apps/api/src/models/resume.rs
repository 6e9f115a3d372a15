use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded resume. Created with only the owner and file; the derived
/// fields are filled in once by the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub skills: String,
    pub ats_score: i32,
}

/// Fields derived from the resume text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub name: String,
    pub email: String,
    pub skills: String,
    pub ats_score: u8,
}
