use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::upload::{process_upload, UploadedFile};
use crate::state::AppState;
use crate::users::identity::CurrentUser;

/// Multipart part carrying the resume document.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file: String,
    pub uploaded_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    /// Comma-joined matched skills, or "Not detected".
    pub skills: String,
    pub ats_score: i32,
}

impl From<ResumeRow> for ResumeResponse {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            file: row.file_path,
            uploaded_at: row.uploaded_at,
            name: row.name,
            email: row.email,
            skills: row.skills,
            ats_score: row.ats_score,
        }
    }
}

/// POST /api/v1/resumes
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeResponse>), AppError> {
    let upload = read_upload(multipart).await?;
    let resume = process_upload(state.store.as_ref(), state.files.as_ref(), user.id, upload).await?;
    Ok((StatusCode::CREATED, Json(resume.into())))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ResumeResponse>>, AppError> {
    let resumes = state.store.list_resumes(user.id).await?;
    Ok(Json(resumes.into_iter().map(ResumeResponse::from).collect()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume = state
        .store
        .get_resume(user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(resume.into()))
}

/// Pulls the `file` part out of the request. Nothing is stored unless it is
/// present, named and non-empty.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .ok_or_else(|| AppError::Validation("The uploaded file has no name".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("The submitted file is empty".to_string()));
        }

        return Ok(UploadedFile { file_name, data });
    }

    Err(AppError::Validation("No file was submitted".to_string()))
}
