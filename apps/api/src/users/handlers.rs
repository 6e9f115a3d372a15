use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameExists {
    pub exists: bool,
}

/// GET /api/v1/users/check-username?username=
pub async fn handle_check_username(
    State(state): State<AppState>,
    Query(params): Query<UsernameQuery>,
) -> Result<Json<UsernameExists>, AppError> {
    let username = params.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation(
            "Username parameter is required".to_string(),
        ));
    }
    let exists = state.store.username_exists(username).await?;
    Ok(Json(UsernameExists { exists }))
}
