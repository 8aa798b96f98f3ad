use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{get_resource, list_resources, upload_resource};

const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_resources_router(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.upload.attachment_max_bytes + FORM_OVERHEAD_BYTES;

    let public = Router::new()
        .route("/", get(list_resources))
        .route("/{id}", get(get_resource));
    let upload = protect(
        Router::new().route("/", post(upload_resource).layer(DefaultBodyLimit::max(upload_limit))),
        state,
        &[Role::Teacher, Role::Admin],
    );

    public.merge(upload)
}
