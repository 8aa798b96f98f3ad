use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use examguard_auth::{AuthError, Authenticator, Identity, Role, Step};
use examguard_core::AppError;

use crate::metrics::track_auth_rejection;

/// Runs the auth pipeline. Rejected requests never reach the handler.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    req: Request,
    next: Next,
) -> Response {
    match authenticator.run(req).await {
        Step::Continue(req) => next.run(req).await,
        Step::Reject(err) => {
            tracing::debug!(reason = err.reason(), "Request rejected by auth pipeline");
            track_auth_rejection(err.reason());
            err.into_response()
        }
    }
}

/// The identity attached by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.subject
    }

    pub fn role(&self) -> Option<Role> {
        self.0.role
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0.has_role(role)
    }

    /// The subject as a user id. Tokens for subjects that are not user ids
    /// cannot own rows.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.subject)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn class_id(&self) -> Option<&str> {
        self.0.class_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthError::Unauthenticated.to_app_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parses_uuid_subject() {
        let id = Uuid::new_v4();
        let user = AuthUser(Identity::new(id.to_string(), Some(Role::Student)));
        assert_eq!(user.user_id().unwrap(), id);
    }

    #[test]
    fn test_user_id_rejects_other_subjects() {
        let user = AuthUser(Identity::new("u1", Some(Role::Student)));
        let err = user.user_id().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
