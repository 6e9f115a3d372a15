use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::SkillRow;
use crate::state::AppState;
use crate::users::identity::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<SkillRow> for SkillResponse {
    fn from(row: SkillRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

fn validated_name(req: &SkillRequest) -> Result<&str, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Skill name must not be blank".to_string()));
    }
    Ok(name)
}

fn skill_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Skill {id} not found"))
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SkillResponse>>, AppError> {
    let skills = state.store.list_skills(user.id).await?;
    Ok(Json(skills.into_iter().map(SkillResponse::from).collect()))
}

/// POST /api/v1/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SkillRequest>,
) -> Result<(StatusCode, Json<SkillResponse>), AppError> {
    let name = validated_name(&req)?;
    let skill = state.store.create_skill(user.id, name).await?;
    Ok((StatusCode::CREATED, Json(skill.into())))
}

/// GET /api/v1/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SkillResponse>, AppError> {
    let skill = state
        .store
        .get_skill(user.id, id)
        .await?
        .ok_or_else(|| skill_not_found(id))?;
    Ok(Json(skill.into()))
}

/// PUT / PATCH /api/v1/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<SkillResponse>, AppError> {
    let name = validated_name(&req)?;
    let skill = state
        .store
        .rename_skill(user.id, id, name)
        .await?
        .ok_or_else(|| skill_not_found(id))?;
    Ok(Json(skill.into()))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_skill(user.id, id).await? {
        return Err(skill_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
