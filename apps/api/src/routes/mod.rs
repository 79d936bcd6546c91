pub mod applications;
pub mod health;
pub mod profile;

use axum::{
    routing::{get, post},
    Router,
};

use crate::flows::handlers as flows;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).patch(profile::handle_update_profile),
        )
        .route("/api/v1/profile/resume", post(profile::handle_upload_resume))
        // Application tracking
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications).post(applications::handle_track_job),
        )
        .route(
            "/api/v1/applications/summary",
            get(applications::handle_summary),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application)
                .patch(applications::handle_update_application)
                .delete(applications::handle_remove_application),
        )
        .route(
            "/api/v1/applications/:id/tailor",
            post(flows::handle_tailor_application),
        )
        // LLM flows
        .route("/api/v1/jobs/search", post(flows::handle_search_jobs))
        .route("/api/v1/tailor-resume", post(flows::handle_tailor_resume))
        // PDF export
        .route(
            "/api/v1/download-resume",
            post(render::handle_download_resume),
        )
        .with_state(state)
}
