use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{AuthResponse, GreetingResponse, IdentityResponse, LoginRequest, RegisterRequest};
use super::service::AuthService;

/// Error body shared by every route.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
}

const REGISTRATION_RESTRICTED: &str = "Registration restricted. Admin token required.";

/// Register a new user
///
/// Open when self-registration is enabled; otherwise the caller must present
/// an admin token. Only admins may create non-student accounts.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Missing username or short password", body = ErrorResponse),
        (status = 403, description = "Registration restricted", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<ValidatedJson<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let is_admin = state.authenticator.is_admin_best_effort(&headers).await;
    if !state.config.registration.allow_self_register && !is_admin {
        return Err(AppError::forbidden(REGISTRATION_RESTRICTED.to_string()));
    }

    let ValidatedJson(dto) = body?;
    if !is_admin && dto.role.is_some_and(|r| r != examguard_auth::Role::Student) {
        return Err(AppError::forbidden(REGISTRATION_RESTRICTED.to_string()));
    }

    let response = AuthService::register(
        &state.db,
        state.authenticator.codec(),
        dto,
        state.config.registration.salt_rounds,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with username or email and receive a token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, state.authenticator.codec(), dto).await?;
    Ok(Json(response))
}

/// Identity attached to the current request
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn get_me(auth_user: AuthUser) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        ok: true,
        user: auth_user.0,
    })
}

#[utoipa::path(
    get,
    path = "/api/auth/admin-only",
    responses(
        (status = 200, description = "Caller is an admin", body = GreetingResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn admin_only(auth_user: AuthUser) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        ok: true,
        message: "Hello admin".to_string(),
        user: auth_user.0,
    })
}
