use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;

use examguard_core::{AppError, UploadPolicy};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::LoginRequest;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::utils::{ClientIp, parse_id};
use crate::validator::ValidatedJson;

use super::model::{
    ApplicationCreatedResponse, ApplicationResponse, FILE_FIELDS, NewApplication,
};
use super::service::ApplicationService;

/// Submit an admission application
///
/// Multipart form. Accepts one `idFile` and up to ten `transcripts`
/// (PDF, JPEG or PNG).
#[utoipa::path(
    post,
    path = "/api/application",
    request_body(content_type = "multipart/form-data", description = "Application form with documents"),
    responses(
        (status = 201, description = "Application submitted", body = ApplicationCreatedResponse),
        (status = 400, description = "Missing field or rejected document", body = ErrorResponse),
        (status = 409, description = "Username already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Applications"
)]
#[instrument(skip_all, fields(source_ip = ?client_ip.0))]
pub async fn submit_application(
    State(state): State<AppState>,
    client_ip: ClientIp,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationCreatedResponse>), AppError> {
    let policy = UploadPolicy::documents(state.config.upload.document_max_bytes);
    let form = UploadForm::read(multipart, &FILE_FIELDS, &policy).await?;
    let new = NewApplication::from_form(&form)?;

    let application = ApplicationService::submit(
        &state.db,
        state.storage.as_ref(),
        new,
        form,
        client_ip.0,
        state.config.registration.salt_rounds,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationCreatedResponse {
            ok: true,
            application,
        }),
    ))
}

/// Applicant login with username or email
#[utoipa::path(
    post,
    path = "/api/application/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Application details", body = ApplicationResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Applications"
)]
#[instrument(skip_all)]
pub async fn application_login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = ApplicationService::login(&state.db, dto).await?;
    Ok(Json(ApplicationResponse {
        ok: true,
        application,
    }))
}

#[utoipa::path(
    get,
    path = "/api/application/{id}",
    params(("id" = String, Path, description = "Application ID (UUID)")),
    responses(
        (status = 200, description = "Application details", body = ApplicationResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Applications"
)]
#[instrument(skip(state))]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = ApplicationService::get(&state.db, parse_id(&id)?).await?;
    Ok(Json(ApplicationResponse {
        ok: true,
        application,
    }))
}
