use anyhow::anyhow;
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

use super::model::{FILE_FIELDS, NewResource, ResourceFilter, ResourceListResponse, ResourceResponse};
use super::service::ResourceService;

const UPLOAD_AREA: &str = "resources";

/// List learning resources
#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceFilter),
    responses((status = 200, description = "Newest resources first", body = ResourceListResponse)),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> Result<Json<ResourceListResponse>, AppError> {
    let resources = ResourceService::list(&state.db, filter.resource_type.as_deref()).await?;
    Ok(Json(ResourceListResponse { ok: true, resources }))
}

/// Upload a resource file
#[utoipa::path(
    post,
    path = "/api/resources",
    request_body(content_type = "multipart/form-data", description = "file plus optional title and type"),
    responses(
        (status = 201, description = "Resource stored", body = ResourceResponse),
        (status = 400, description = "File missing or rejected", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn upload_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResourceResponse>), AppError> {
    let owner_id = auth_user.user_id()?;
    let policy = UploadPolicy::any(state.config.upload.attachment_max_bytes);
    let form = UploadForm::read(multipart, &FILE_FIELDS, &policy).await?;
    if !form.has_files("file") {
        return Err(AppError::bad_request(anyhow!("File required")));
    }

    let title = form.text("title");
    let resource_type = form.text("type");
    let mut files = form.store(state.storage.as_ref(), UPLOAD_AREA).await?;
    let file = files
        .remove("file")
        .and_then(|mut stored| stored.pop())
        .ok_or_else(|| AppError::bad_request(anyhow!("File required")))?;

    let new = NewResource::new(title, resource_type, &file);
    let resource = ResourceService::create(&state.db, new, owner_id).await?;
    Ok((StatusCode::CREATED, Json(ResourceResponse { ok: true, resource })))
}

/// Fetch one resource
#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    params(("id" = String, Path, description = "Resource ID (UUID)")),
    responses(
        (status = 200, description = "Resource", body = ResourceResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResourceResponse>, AppError> {
    let resource = ResourceService::get(&state.db, parse_id(&id)?).await?;
    Ok(Json(ResourceResponse { ok: true, resource }))
}
