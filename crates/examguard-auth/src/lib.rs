//! # ExamGuard Auth
//!
//! Authentication and authorization for the ExamGuard API.
//!
//! Every protected request runs through the same pipeline:
//!
//! 1. **Extract** a token from `Authorization: Bearer <token>` or the token cookie
//! 2. **Verify** it with the [`TokenCodec`] (HS256 signature and expiry)
//! 3. **Resolve** the claims into an [`Identity`], optionally loading the user
//!    record through a [`UserStore`]
//! 4. **Attach** the identity to the request extensions
//!
//! Each stage returns a [`Step`]; the first [`Step::Reject`] ends the request
//! with an [`AuthError`]. A [`RoleGate`] then decides whether the attached
//! identity may reach a route.
//!
//! # Example
//!
//! ```ignore
//! use examguard_auth::{Authenticator, Role, RoleGate, Step};
//! use examguard_config::JwtConfig;
//!
//! let auth = Authenticator::from_config(&JwtConfig::from_env()?, Some(store));
//! let token = auth.codec().sign("u1", Role::Teacher)?;
//!
//! match auth.authenticate(&headers).await {
//!     Step::Continue(identity) => RoleGate::new([Role::Teacher]).check(Some(&identity))?,
//!     Step::Reject(err) => return Err(err.to_app_error()),
//! }
//! ```

pub mod claims;
pub mod codec;
pub mod error;
pub mod gate;
pub mod identity;
pub mod pipeline;
pub mod role;

pub use claims::{Claims, TokenPayload};
pub use codec::TokenCodec;
pub use error::AuthError;
pub use gate::RoleGate;
pub use identity::{
    Identity, IdentityResolver, InMemoryUserStore, UserProfile, UserRecord, UserStore,
    UserStoreFuture, normalize,
};
pub use pipeline::{Authenticator, Step, bearer_token, cookie_token};
pub use role::{Role, UnknownRole};
