pub mod health;
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/upload", post(upload::handle_upload))
        .route(
            "/upload_job_description",
            post(upload::handle_upload_job_description),
        )
        .with_state(state)
}
