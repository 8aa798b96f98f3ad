//! Operator commands used by the `examguard-cli` binary.

use sqlx::PgPool;

use examguard_auth::UserProfile;
use examguard_core::AppError;

use crate::modules::auth::service::AuthService;

/// Input for bootstrapping an admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Creates an admin. Needed when self-registration is disabled, since only
/// an admin can register other users then.
pub async fn create_admin(
    db: &PgPool,
    admin: &NewAdmin,
    salt_rounds: u32,
) -> Result<UserProfile, AppError> {
    AuthService::create_admin(
        db,
        admin.username.trim(),
        admin.email.as_deref(),
        &admin.password,
        admin.first_name.as_deref(),
        admin.last_name.as_deref(),
        salt_rounds,
    )
    .await
}
