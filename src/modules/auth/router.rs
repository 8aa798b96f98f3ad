use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{admin_only, get_me, login_user, register_user};

pub fn init_auth_router(state: &AppState) -> anyhow::Result<Router<AppState>> {
    let credentials = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user));

    let me = protect(Router::new().route("/me", get(get_me)), state, &[]);
    let admin = protect(
        Router::new().route("/admin-only", get(admin_only)),
        state,
        &[Role::Admin],
    );

    let router = credentials.merge(me).merge(admin);

    if !state.config.rate_limit.enabled {
        return Ok(router);
    }
    let governor = state.config.rate_limit.auth_governor_config()?;
    Ok(router.layer(GovernorLayer::new(Arc::new(governor))))
}
