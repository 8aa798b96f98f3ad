use axum::{
    Router,
    routing::{get, post},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{list_messages, send_message};

pub fn init_messages_router(state: &AppState) -> Router<AppState> {
    let send = protect(
        Router::new().route("/", post(send_message)),
        state,
        &[Role::Teacher, Role::Admin, Role::Staff],
    );
    let inbox = protect(Router::new().route("/", get(list_messages)), state, &[]);

    send.merge(inbox)
}
