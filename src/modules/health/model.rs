use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// Seconds since the server started.
    pub uptime: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub ok: bool,
    pub name: String,
    pub env: String,
    pub version: String,
}
