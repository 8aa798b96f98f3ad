//! Role-based access checks on an attached [`Identity`].

use std::sync::Arc;

use crate::error::AuthError;
use crate::identity::Identity;
use crate::role::Role;

/// The set of roles allowed through one route group.
///
/// An empty set admits any authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    allowed: Arc<[Role]>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut allowed: Vec<Role> = roles.into_iter().collect();
        allowed.dedup();
        Self {
            allowed: allowed.into(),
        }
    }

    pub fn authenticated() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AuthError> {
        let identity = identity.ok_or(AuthError::Unauthenticated)?;

        if self.allowed.is_empty() {
            return Ok(());
        }

        match identity.role {
            Some(role) if self.allowed.contains(&role) => Ok(()),
            _ => Err(AuthError::Forbidden),
        }
    }
}
