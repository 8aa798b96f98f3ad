use axum::{Json, extract::State};
use tracing::instrument;

use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

use super::model::StudentDashboard;
use super::service::StudentService;

/// Dashboard data for the signed-in student
#[utoipa::path(
    get,
    path = "/api/students/me",
    responses(
        (status = 200, description = "Profile with upcoming assignments, invoices and quizzes", body = StudentDashboard),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user), fields(subject = %auth_user.subject()))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentDashboard>, AppError> {
    let dashboard = StudentService::dashboard(&state.db, auth_user.0).await?;
    Ok(Json(dashboard))
}
