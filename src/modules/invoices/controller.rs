use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use examguard_auth::Role;
use examguard_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::parse_id;
use crate::validator::ValidatedJson;

use super::model::{
    CreateInvoiceRequest, InvoiceFilter, InvoiceListResponse, InvoiceResponse, PayInvoiceRequest,
};
use super::service::InvoiceService;

/// Students only ever see and pay their own invoices.
fn owner_scope(auth_user: &AuthUser) -> Result<Option<uuid::Uuid>, AppError> {
    if auth_user.has_role(Role::Student) {
        auth_user.user_id().map(Some)
    } else {
        Ok(None)
    }
}

/// Raise an invoice
#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Forbidden - admins and staff only", body = ErrorResponse),
        (status = 409, description = "Duplicate reference", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
#[instrument(skip(state, dto))]
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let invoice = InvoiceService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse { ok: true, invoice })))
}

/// List invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    params(InvoiceFilter),
    responses(
        (status = 200, description = "Invoices visible to the caller", body = InvoiceListResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
#[instrument(skip(state, auth_user), fields(subject = %auth_user.subject()))]
pub async fn list_invoices(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filter): Query<InvoiceFilter>,
) -> Result<Json<InvoiceListResponse>, AppError> {
    let invoices =
        InvoiceService::list(&state.db, owner_scope(&auth_user)?, filter.status()?, None).await?;
    Ok(Json(InvoiceListResponse { ok: true, invoices }))
}

/// Record a payment against an invoice
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/pay",
    params(("id" = String, Path, description = "Invoice ID (UUID)")),
    request_body = PayInvoiceRequest,
    responses(
        (status = 200, description = "Updated invoice", body = InvoiceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Invoice not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
#[instrument(skip(state, auth_user, dto), fields(subject = %auth_user.subject()))]
pub async fn pay_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    dto: Option<ValidatedJson<PayInvoiceRequest>>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let amount = dto.and_then(|ValidatedJson(dto)| dto.amount).unwrap_or(0.0);
    let invoice =
        InvoiceService::pay(&state.db, parse_id(&id)?, owner_scope(&auth_user)?, amount).await?;
    Ok(Json(InvoiceResponse { ok: true, invoice }))
}
