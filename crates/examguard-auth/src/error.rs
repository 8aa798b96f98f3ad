use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use examguard_core::AppError;

/// Why a request was refused by the auth pipeline or a role gate.
///
/// Deliberately not a `std::error::Error`, so `?` cannot turn it into a 500
/// through `AppError`'s blanket conversion. Use [`AuthError::to_app_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    /// Bad signature, expired, malformed, or an internal failure while
    /// checking the token. All look the same to the client.
    InvalidToken,
    MissingSubject,
    UserNotFound,
    /// A gate ran without an identity attached.
    Unauthenticated,
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::MissingSubject
            | AuthError::UserNotFound
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::MissingSubject => "Invalid token payload",
            AuthError::UserNotFound => "User not found",
            AuthError::Unauthenticated => "Not authenticated",
            AuthError::Forbidden => "Insufficient permissions",
        }
    }

    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::MissingSubject => "missing_subject",
            AuthError::UserNotFound => "user_not_found",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
        }
    }

    pub fn to_app_error(self) -> AppError {
        AppError::new(self.status(), anyhow::anyhow!(self.message()))
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MissingSubject.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_app_error_keeps_status_and_message() {
        let err = AuthError::Forbidden.to_app_error();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Insufficient permissions");
    }

    #[test]
    fn test_reasons_are_distinct() {
        let all = [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::MissingSubject,
            AuthError::UserNotFound,
            AuthError::Unauthenticated,
            AuthError::Forbidden,
        ];
        let mut reasons: Vec<_> = all.iter().map(|e| e.reason()).collect();
        reasons.sort();
        reasons.dedup();
        assert_eq!(reasons.len(), all.len());
    }
}
