use axum::{
    Router,
    routing::{get, post},
};

use examguard_auth::Role;

use crate::middleware::protect;
use crate::state::AppState;

use super::controller::{create_invoice, list_invoices, pay_invoice};

pub fn init_invoices_router(state: &AppState) -> Router<AppState> {
    let billing = protect(
        Router::new().route("/", post(create_invoice)),
        state,
        &[Role::Admin, Role::Staff],
    );
    let account = protect(
        Router::new()
            .route("/", get(list_invoices))
            .route("/{id}/pay", post(pay_invoice)),
        state,
        &[],
    );

    billing.merge(account)
}
