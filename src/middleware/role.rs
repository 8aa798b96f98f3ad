use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use examguard_auth::{Identity, RoleGate};

use crate::metrics::track_authorization_check;

/// Admits the request when `gate` accepts the attached identity.
///
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(
///     RoleGate::new([Role::Admin]),
///     require_role,
/// ));
/// ```
pub async fn require_role(State(gate): State<RoleGate>, req: Request, next: Next) -> Response {
    let identity = req.extensions().get::<Identity>();
    let role = identity
        .and_then(|i| i.role)
        .map(|r| r.as_str())
        .unwrap_or("none");

    match gate.check(identity) {
        Ok(()) => {
            track_authorization_check(true, role);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(role, allowed = ?gate.allowed(), reason = err.reason(), "Role gate denied request");
            track_authorization_check(false, role);
            err.into_response()
        }
    }
}
