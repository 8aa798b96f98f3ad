use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{application_login, get_application, submit_application};
use super::model::FILE_FIELDS;

const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_applications_router(state: &AppState) -> Router<AppState> {
    let max_files: usize = FILE_FIELDS.iter().map(|f| f.max_count).sum();
    let body_limit = state.config.upload.document_max_bytes * max_files + FORM_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/",
            post(submit_application).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/login", post(application_login))
        .route("/{id}", get(get_application))
}
