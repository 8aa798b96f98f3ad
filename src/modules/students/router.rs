use axum::{Router, routing::get};

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::get_dashboard;

pub fn init_students_router(state: &AppState) -> Router<AppState> {
    protect(Router::new().route("/me", get(get_dashboard)), state, &[])
}
