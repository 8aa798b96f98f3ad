//! The per-request authentication pipeline.
//!
//! ```text
//! Unauthenticated -> TokenExtracted -> TokenVerified -> IdentityAttached
//!        \                 \                 \
//!         `----------------'-----------------'--> Rejected(AuthError)
//! ```

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request};
use axum_extra::extract::cookie::CookieJar;

use examguard_config::JwtConfig;

use crate::claims::TokenPayload;
use crate::codec::TokenCodec;
use crate::error::AuthError;
use crate::identity::{Identity, IdentityResolver, UserStore};

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<C> {
    Continue(C),
    Reject(AuthError),
}

impl<C> Step<C> {
    pub fn into_result(self) -> Result<C, AuthError> {
        match self {
            Step::Continue(ctx) => Ok(ctx),
            Step::Reject(err) => Err(err),
        }
    }
}

impl<C> From<Result<C, AuthError>> for Step<C> {
    fn from(result: Result<C, AuthError>) -> Self {
        match result {
            Ok(ctx) => Step::Continue(ctx),
            Err(err) => Step::Reject(err),
        }
    }
}

/// Token from an `Authorization` value of the form `Bearer <token>`.
/// The scheme is case-insensitive and any whitespace separates it from the
/// token. Anything else yields `None`.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(token)
}

/// Non-empty value of the named cookie.
pub fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Runs extract, verify, resolve and attach for each request.
#[derive(Debug)]
pub struct Authenticator {
    codec: TokenCodec,
    resolver: IdentityResolver,
    cookie_name: String,
}

impl Authenticator {
    pub fn new(codec: TokenCodec, resolver: IdentityResolver, cookie_name: impl Into<String>) -> Self {
        Self {
            codec,
            resolver,
            cookie_name: cookie_name.into(),
        }
    }

    /// Uses the user store only when `resolve_user` is set and a store is given.
    pub fn from_config(config: &JwtConfig, store: Option<Arc<dyn UserStore>>) -> Self {
        let resolver = match store {
            Some(store) if config.resolve_user => IdentityResolver::WithUserStore(store),
            _ => IdentityResolver::Minimal,
        };
        Self::new(TokenCodec::from_config(config), resolver, config.cookie_name.clone())
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Bearer header first, then the token cookie.
    pub fn extract(&self, headers: &HeaderMap) -> Step<String> {
        let from_header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        match from_header.or_else(|| cookie_token(headers, &self.cookie_name)) {
            Some(token) => Step::Continue(token),
            None => Step::Reject(AuthError::MissingToken),
        }
    }

    pub fn verify(&self, token: &str) -> Step<TokenPayload> {
        self.codec.verify(token).into()
    }

    pub async fn resolve(&self, payload: &TokenPayload) -> Step<Identity> {
        self.resolver.resolve(payload).await.into()
    }

    /// Extract, verify and resolve without touching a request.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Step<Identity> {
        let token = match self.extract(headers) {
            Step::Continue(token) => token,
            Step::Reject(err) => return Step::Reject(err),
        };
        let payload = match self.verify(&token) {
            Step::Continue(payload) => payload,
            Step::Reject(err) => return Step::Reject(err),
        };
        self.resolve(&payload).await
    }

    /// Full pipeline. On success the request carries an [`Identity`]
    /// extension; on rejection the request is dropped untouched.
    pub async fn run<B>(&self, mut req: Request<B>) -> Step<Request<B>> {
        match self.authenticate(req.headers()).await {
            Step::Continue(identity) => {
                tracing::debug!(subject = %identity.subject, role = ?identity.role, "Identity attached");
                req.extensions_mut().insert(identity);
                Step::Continue(req)
            }
            Step::Reject(err) => Step::Reject(err),
        }
    }

    /// Identity of the caller if one can be established, for routes that are
    /// public but behave differently for some callers. Failures are logged
    /// and treated as anonymous.
    pub async fn authenticate_optional(&self, headers: &HeaderMap) -> Option<Identity> {
        match self.authenticate(headers).await {
            Step::Continue(identity) => Some(identity),
            Step::Reject(AuthError::MissingToken) => None,
            Step::Reject(err) => {
                tracing::warn!(reason = err.reason(), "Ignoring unusable credentials");
                None
            }
        }
    }

    /// Whether the caller is an admin. Never fails; anything short of a
    /// verified admin identity is `false`.
    pub async fn is_admin_best_effort(&self, headers: &HeaderMap) -> bool {
        self.authenticate_optional(headers)
            .await
            .is_some_and(|identity| identity.is_admin())
    }
}
