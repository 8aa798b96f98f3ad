use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{SaveTimetableRequest, TimetableEntriesResponse, TimetableQuery, TimetableResponse};
use super::service::TimetableService;

/// Timetable for a class
#[utoipa::path(
    get,
    path = "/api/timetable",
    params(TimetableQuery),
    responses(
        (status = 200, description = "Entries, empty when none saved", body = TimetableEntriesResponse),
        (status = 400, description = "No class given and caller has none", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Timetable"
)]
#[instrument(skip(state, auth_user), fields(subject = %auth_user.subject()))]
pub async fn get_timetable(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<TimetableEntriesResponse>, AppError> {
    let class_id = query
        .class
        .or_else(|| auth_user.class_id().map(str::to_string))
        .ok_or_else(|| AppError::bad_request(anyhow!("class query required")))?;

    let timetable = TimetableService::entries_for_class(&state.db, &class_id).await?;
    Ok(Json(TimetableEntriesResponse { ok: true, timetable }))
}

/// Create or replace a class timetable
#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = SaveTimetableRequest,
    responses(
        (status = 200, description = "Saved timetable", body = TimetableResponse),
        (status = 400, description = "classId missing", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers and admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Timetable"
)]
#[instrument(skip(state, dto))]
pub async fn save_timetable(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SaveTimetableRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    let class_id = dto
        .class_id
        .ok_or_else(|| AppError::bad_request(anyhow!("classId required")))?;

    let timetable = TimetableService::save(&state.db, &class_id, dto.entries).await?;
    Ok(Json(TimetableResponse { ok: true, timetable }))
}
