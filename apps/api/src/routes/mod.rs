pub mod health;
pub mod render;
pub mod resumes;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalogue + data helpers
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/resumes/sample", get(resumes::handle_sample))
        .route("/api/v1/resumes/edits", post(resumes::handle_apply_edits))
        // Render preview + export
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/export", post(render::handle_export))
        .with_state(state)
}
