pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers as resumes;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/users/check-username",
            get(users::handle_check_username),
        )
        // Skills
        .route(
            "/api/v1/skills",
            get(skills::handle_list_skills).post(skills::handle_create_skill),
        )
        .route(
            "/api/v1/skills/:id",
            get(skills::handle_get_skill)
                .put(skills::handle_update_skill)
                .patch(skills::handle_update_skill)
                .delete(skills::handle_delete_skill),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume)
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        .with_state(state)
}
