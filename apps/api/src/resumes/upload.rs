//! Upload pipeline: store the file, create the resume shell, extract text,
//! derive fields, persist them.

use std::path::PathBuf;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{DerivedFields, ResumeRow};
use crate::parsing::fields::{extract_email, extract_name};
use crate::parsing::skills::{display_skills, match_skills, score_from_counts};
use crate::parsing::{extract_text, FileKind};
use crate::storage::FileStorage;
use crate::store::Store;

/// A validated upload: non-empty content with a client file name.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Runs the whole pipeline for one upload and returns the finalized resume.
///
/// The resume row is committed before the file kind is checked, so an
/// unsupported upload still leaves a record with empty derived fields.
pub async fn process_upload(
    store: &dyn Store,
    files: &dyn FileStorage,
    user_id: Uuid,
    upload: UploadedFile,
) -> Result<ResumeRow, AppError> {
    let path = files.save(&upload.file_name, upload.data).await?;
    let resume = store
        .create_resume(user_id, &path.to_string_lossy())
        .await?;

    let kind = FileKind::from_file_name(&upload.file_name).ok_or_else(|| {
        warn!(
            "Resume {} has unsupported file type: {}",
            resume.id, upload.file_name
        );
        AppError::UnsupportedFileType(format!(
            "Unsupported file type: '{}'. Upload a .docx or .pdf file",
            upload.file_name
        ))
    })?;
    info!("Parsing resume {} as {kind:?}", resume.id);

    let text = extract_text_or_empty(path, kind).await;

    // Read-then-use: a skill added concurrently may or may not be seen.
    let known_skills: Vec<String> = store
        .list_skills(user_id)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    let fields = derive_fields(&text, &known_skills);
    info!(
        "Resume {}: skills [{}] of {} known, ATS score {}",
        resume.id,
        fields.skills,
        known_skills.len(),
        fields.ats_score
    );

    store.update_resume_fields(resume.id, &fields).await
}

/// Name, email, matched skills and ATS score for one extracted text.
pub fn derive_fields(text: &str, known_skills: &[String]) -> DerivedFields {
    let matched = match_skills(text, known_skills);
    DerivedFields {
        name: extract_name(text),
        email: extract_email(text),
        ats_score: score_from_counts(matched.len(), known_skills.len()),
        skills: display_skills(&matched),
    }
}

/// Extraction failures are logged and degrade to empty text; the caller never
/// sees them.
async fn extract_text_or_empty(path: PathBuf, kind: FileKind) -> String {
    let path_str = path.display().to_string();
    match tokio::task::spawn_blocking(move || extract_text(&path, kind)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(path = %path_str, "Text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(path = %path_str, "Text extraction task did not complete: {e}");
            String::new()
        }
    }
}
