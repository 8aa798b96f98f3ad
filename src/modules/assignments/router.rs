use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{create_assignment, list_assignments, submit_assignment};
use super::model::ATTACHMENT_FIELDS;

const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_assignments_router(state: &AppState) -> Router<AppState> {
    let max_files: usize = ATTACHMENT_FIELDS.iter().map(|f| f.max_count).sum();
    let upload_limit = state.config.upload.attachment_max_bytes * max_files + FORM_OVERHEAD_BYTES;

    let manage = protect(
        Router::new().route("/", post(create_assignment).layer(DefaultBodyLimit::max(upload_limit))),
        state,
        &[Role::Teacher, Role::Admin],
    );
    let read = protect(Router::new().route("/", get(list_assignments)), state, &[]);
    let submit = protect(
        Router::new().route("/{id}/submit", post(submit_assignment).layer(DefaultBodyLimit::max(upload_limit))),
        state,
        &[Role::Student],
    );

    manage.merge(read).merge(submit)
}
