use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::parse_id;
use crate::validator::ValidatedJson;

use super::model::{GenerateQuizRequest, GeneratedQuizResponse, QuizResponse};
use super::service::AiQuizService;

/// Generate a placeholder quiz
#[utoipa::path(
    post,
    path = "/api/ai/generate",
    request_body = GenerateQuizRequest,
    responses(
        (status = 201, description = "Quiz stored", body = GeneratedQuizResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "AI"
)]
#[instrument(skip(state, auth_user, dto), fields(subject = %auth_user.subject()))]
pub async fn generate_quiz(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<GenerateQuizRequest>,
) -> Result<(StatusCode, Json<GeneratedQuizResponse>), AppError> {
    let quiz = AiQuizService::generate(&state.db, auth_user.user_id()?, &dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(GeneratedQuizResponse {
            ok: true,
            id: quiz.id,
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            count: quiz.count,
        }),
    ))
}

/// Fetch a stored quiz
#[utoipa::path(
    get,
    path = "/api/ai/{id}",
    params(("id" = String, Path, description = "Quiz ID (UUID)")),
    responses(
        (status = 200, description = "Quiz with questions", body = QuizResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "AI"
)]
#[instrument(skip(state))]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizResponse>, AppError> {
    let quiz = AiQuizService::get(&state.db, parse_id(&id)?).await?;
    Ok(Json(QuizResponse { ok: true, quiz }))
}
