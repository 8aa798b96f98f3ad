use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{MessageListResponse, MessageResponse, SendMessageRequest};
use super::service::MessageService;

/// Send a message to a user or a class
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers, admins and staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, auth_user, dto), fields(subject = %auth_user.subject()))]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let message = MessageService::send(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse { ok: true, message })))
}

/// Inbox for the current user
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Newest messages first", body = MessageListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, auth_user), fields(subject = %auth_user.subject()))]
pub async fn list_messages(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageListResponse>, AppError> {
    let messages = MessageService::inbox(&state.db, auth_user.subject()).await?;
    Ok(Json(MessageListResponse { ok: true, messages }))
}
