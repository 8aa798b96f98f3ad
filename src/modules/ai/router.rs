use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{generate_quiz, get_quiz};

pub fn init_ai_router(state: &AppState) -> Router<AppState> {
    protect(
        Router::new()
            .route("/generate", post(generate_quiz))
            .route("/{id}", get(get_quiz)),
        state,
        &[],
    )
}
