use axum::{Json, extract::State, http::StatusCode};

use crate::state::AppState;

use super::model::{HealthResponse, InfoResponse, ReadyResponse};

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Process is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Readiness probe: the database must answer
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Ready to serve", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = ReadyResponse)
    ),
    tag = "Health"
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if examguard_db::ping(&state.db).await {
        return (
            StatusCode::OK,
            Json(ReadyResponse {
                ok: true,
                message: None,
            }),
        );
    }

    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ReadyResponse {
            ok: false,
            message: Some("Database unavailable".to_string()),
        }),
    )
}

/// Service name, environment and version
#[utoipa::path(
    get,
    path = "/api/info",
    responses((status = 200, description = "Build info", body = InfoResponse)),
    tag = "Health"
)]
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        ok: true,
        name: env!("CARGO_PKG_NAME").to_string(),
        env: state.config.server.env.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
