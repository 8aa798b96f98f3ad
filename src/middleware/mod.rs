//! Request middleware and extractors for authentication and authorization.
//!
//! - [`auth`]: runs the token pipeline and exposes the caller as [`auth::AuthUser`]
//! - [`role`]: enforces a [`RoleGate`] on top of an authenticated request
//!
//! Route groups are protected with [`protect`], which stacks both layers so
//! the token is checked before the role:
//!
//! ```ignore
//! let manage = Router::new().route("/", post(create_invoice));
//! protect(manage, state, &[Role::Admin, Role::Staff])
//! ```

pub mod auth;
pub mod role;

use axum::{Router, middleware};

use examguard_auth::{Role, RoleGate};

use crate::state::AppState;

/// Requires a valid token on every route in `router` and admits only
/// `roles`. An empty slice admits any authenticated caller.
pub fn protect<S>(router: Router<S>, state: &AppState, roles: &[Role]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn_with_state(
            RoleGate::new(roles.iter().copied()),
            role::require_role,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            auth::authenticate,
        ))
}
