use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use examguard_core::{AppError, UploadPolicy};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::parse_id;
use crate::utils::upload::UploadForm;

use super::model::{
    ATTACHMENT_FIELDS, AssignmentFilter, AssignmentListResponse, AssignmentResponse,
    AssignmentSubmissionResponse, NewAssignment, SUBMISSION_FIELDS,
};
use super::service::AssignmentService;

const UPLOAD_AREA: &str = "assignments";

/// Create an assignment with up to six attachments
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body(content_type = "multipart/form-data", description = "title, classId, description, due and attachments"),
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn create_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssignmentResponse>), AppError> {
    let created_by = auth_user.user_id()?;
    let policy = UploadPolicy::any(state.config.upload.attachment_max_bytes);
    let form = UploadForm::read(multipart, &ATTACHMENT_FIELDS, &policy).await?;
    let new = NewAssignment::from_form(&form)?;

    let mut files = form.store(state.storage.as_ref(), UPLOAD_AREA).await?;
    let attachments = files.remove("attachments").unwrap_or_default();

    let assignment = AssignmentService::create(&state.db, new, attachments, created_by).await?;
    Ok((
        StatusCode::CREATED,
        Json(AssignmentResponse {
            ok: true,
            assignment,
        }),
    ))
}

/// List assignments, soonest due first
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentFilter),
    responses(
        (status = 200, description = "Assignments", body = AssignmentListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<AssignmentListResponse>, AppError> {
    let assignments = AssignmentService::list(&state.db, filter.class_id.as_deref()).await?;
    Ok(Json(AssignmentListResponse {
        ok: true,
        assignments,
    }))
}

/// Hand in work for an assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submit",
    params(("id" = String, Path, description = "Assignment ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "text and up to six files"),
    responses(
        (status = 201, description = "Submission recorded", body = AssignmentSubmissionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - students only", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject(), assignment = %id))]
pub async fn submit_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssignmentSubmissionResponse>), AppError> {
    let student_id = auth_user.user_id()?;
    let assignment_id = parse_id(&id)?;
    if !AssignmentService::exists(&state.db, assignment_id).await? {
        return Err(AssignmentService::not_found());
    }

    let policy = UploadPolicy::any(state.config.upload.attachment_max_bytes);
    let form = UploadForm::read(multipart, &SUBMISSION_FIELDS, &policy).await?;
    let text = form.text("text");
    let mut files = form.store(state.storage.as_ref(), UPLOAD_AREA).await?;

    let submission = AssignmentService::submit(
        &state.db,
        assignment_id,
        student_id,
        files.remove("files").unwrap_or_default(),
        text,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentSubmissionResponse {
            ok: true,
            submission,
        }),
    ))
}
