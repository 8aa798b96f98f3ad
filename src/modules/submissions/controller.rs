use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use examguard_core::{AppError, PageParams, Paginated};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::parse_id;
use crate::validator::ValidatedJson;

use super::model::{
    ResultsFilter, Submission, SubmissionFilter, SubmissionListResponse, SubmissionResponse,
    SubmitExamRequest, UpdateStatusRequest, UpdateSubmissionRequest,
};
use super::service::SubmissionService;

/// Submit answers for an exam
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/submit",
    params(("id" = String, Path, description = "Exam ID")),
    request_body = SubmitExamRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmissionResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, auth_user, dto), fields(subject = %auth_user.subject()))]
pub async fn submit_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(exam_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<SubmitExamRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let student_id = auth_user.user_id()?;
    let submission = SubmissionService::submit(&state.db, student_id, &exam_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            ok: true,
            submission,
        }),
    ))
}

/// List submissions, newest first
#[utoipa::path(
    get,
    path = "/api/submissions",
    params(SubmissionFilter),
    responses(
        (status = 200, description = "Up to 500 submissions", body = SubmissionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state))]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions =
        SubmissionService::list(&state.db, filter.exam_id.as_deref(), filter.student_id()?).await?;
    Ok(Json(SubmissionListResponse {
        ok: true,
        submissions,
    }))
}

/// Grade a submission or change its status
#[utoipa::path(
    put,
    path = "/api/submissions/{id}",
    params(("id" = String, Path, description = "Submission ID (UUID)")),
    request_body = UpdateSubmissionRequest,
    responses(
        (status = 200, description = "Updated submission", body = SubmissionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, dto))]
pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = SubmissionService::update(&state.db, parse_id(&id)?, dto).await?;
    Ok(Json(SubmissionResponse {
        ok: true,
        submission,
    }))
}

/// Paged results with exam and status filters
#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultsFilter, PageParams),
    responses(
        (status = 200, description = "One page of results", body = Paginated<Submission>),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn list_results(
    State(state): State<AppState>,
    Query(filter): Query<ResultsFilter>,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<Submission>>, AppError> {
    let results =
        SubmissionService::results(&state.db, filter.exam_id.as_deref(), filter.status()?, &page)
            .await?;
    Ok(Json(results))
}

#[utoipa::path(
    put,
    path = "/api/results/{id}/status",
    params(("id" = String, Path, description = "Submission ID (UUID)")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated submission", body = SubmissionResponse),
        (status = 400, description = "Missing or unknown status", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, dto))]
pub async fn update_result_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = SubmissionService::set_status(&state.db, parse_id(&id)?, dto.status).await?;
    Ok(Json(SubmissionResponse {
        ok: true,
        submission,
    }))
}
