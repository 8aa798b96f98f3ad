use axum::{
    Router,
    routing::{get, post, put},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{
    list_results, list_submissions, submit_exam, update_result_status, update_submission,
};

pub fn init_submissions_router(state: &AppState) -> Router<AppState> {
    let student = protect(
        Router::new().route("/{id}/submit", post(submit_exam)),
        state,
        &[Role::Student],
    );
    let staff = protect(
        Router::new()
            .route("/", get(list_submissions))
            .route("/{id}", put(update_submission)),
        state,
        &[Role::Teacher, Role::Admin],
    );

    student.merge(staff)
}

pub fn init_results_router(state: &AppState) -> Router<AppState> {
    protect(
        Router::new()
            .route("/", get(list_results))
            .route("/{id}/status", put(update_result_status)),
        state,
        &[Role::Admin, Role::Teacher],
    )
}
