use axum::{
    Router,
    routing::{get, post},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{get_timetable, save_timetable};

pub fn init_timetable_router(state: &AppState) -> Router<AppState> {
    let read = protect(Router::new().route("/", get(get_timetable)), state, &[]);
    let write = protect(
        Router::new().route("/", post(save_timetable)),
        state,
        &[Role::Teacher, Role::Admin],
    );

    read.merge(write)
}
