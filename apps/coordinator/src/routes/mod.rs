pub mod health;
pub mod profile;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile/load", post(profile::handle_load))
        .route("/api/v1/profile/resume", post(profile::handle_upload_resume))
        .route(
            "/api/v1/profile/jd",
            post(profile::handle_upload_jd).delete(profile::handle_delete_jd),
        )
        .route("/api/v1/profile/research", post(profile::handle_research))
        .route("/api/v1/profile/mode", put(profile::handle_set_mode))
        .route(
            "/api/v1/profile/mode/toggle",
            post(profile::handle_toggle_mode),
        )
        .with_state(state)
}
