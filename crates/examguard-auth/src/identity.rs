//! Turning verified claims into a request identity.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::claims::TokenPayload;
use crate::error::AuthError;
use crate::role::Role;

/// Who is making the request. Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Identity {
    pub subject: String,
    pub role: Option<Role>,
    /// Present when the resolver loaded the user record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            subject: subject.into(),
            role,
            profile: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn class_id(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.class_id.as_deref())
    }
}

/// A user as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_pic: Option<String>,
    pub class_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A stored user, including credentials.
#[derive(Clone, PartialEq)]
pub struct UserRecord {
    pub profile: UserProfile,
    pub password_hash: String,
}

impl UserRecord {
    pub fn sanitize(self) -> UserProfile {
        self.profile
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("profile", &self.profile)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

pub type UserStoreFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<Option<UserRecord>>> + Send + 'a>>;

/// Read-only lookup of users by id.
pub trait UserStore: Send + Sync {
    fn find_by_id<'a>(&'a self, id: &'a str) -> UserStoreFuture<'a>;
}

/// Map-backed [`UserStore`] for tests and tooling.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(record.profile.id.clone(), record);
        }
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_id<'a>(&'a self, id: &'a str) -> UserStoreFuture<'a> {
        Box::pin(async move {
            let users = self
                .users
                .read()
                .map_err(|_| anyhow::anyhow!("user map lock poisoned"))?;
            Ok(users.get(id).cloned())
        })
    }
}

/// Picks the subject from `sub`, then `id`, then `userId`, skipping blank
/// values.
pub fn normalize(payload: &TokenPayload) -> Result<Identity, AuthError> {
    [&payload.sub, &payload.id, &payload.user_id]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|subject| Identity::new(subject, payload.role))
        .ok_or(AuthError::MissingSubject)
}

/// Turns a verified payload into an [`Identity`].
#[derive(Clone)]
pub enum IdentityResolver {
    /// Trust the token's subject and role.
    Minimal,
    /// Also load the user; role and profile come from the stored record.
    WithUserStore(Arc<dyn UserStore>),
}

impl IdentityResolver {
    pub async fn resolve(&self, payload: &TokenPayload) -> Result<Identity, AuthError> {
        let identity = normalize(payload)?;

        let store = match self {
            IdentityResolver::Minimal => return Ok(identity),
            IdentityResolver::WithUserStore(store) => store,
        };

        match store.find_by_id(&identity.subject).await {
            Ok(Some(record)) => {
                let profile = record.sanitize();
                Ok(Identity {
                    subject: identity.subject,
                    role: Some(profile.role),
                    profile: Some(profile),
                })
            }
            Ok(None) => {
                tracing::debug!(subject = %identity.subject, "Token subject has no user record");
                Err(AuthError::UserNotFound)
            }
            Err(e) => {
                tracing::error!(subject = %identity.subject, error = ?e, "User lookup failed");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityResolver::Minimal => f.write_str("Minimal"),
            IdentityResolver::WithUserStore(_) => f.write_str("WithUserStore(..)"),
        }
    }
}
