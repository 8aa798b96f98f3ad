use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{healthz, info, ready};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ready", get(ready))
        .route("/api/info", get(info))
}
