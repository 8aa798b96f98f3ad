use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use examguard_auth::{Role, TokenCodec, UserProfile};
use examguard_core::{AppError, hash_password_with_cost, verify_password};

use crate::metrics::{track_login_failure, track_login_success, track_token_issued, track_user_registered};

use super::model::{AuthResponse, LoginRequest, RegisterRequest, USER_COLUMNS, UserRow};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Postgres unique-violation SQLSTATE.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

pub struct AuthService;

impl AuthService {
    pub fn issue_token(codec: &TokenCodec, user: &UserProfile) -> Result<String, AppError> {
        let token = codec.sign(&user.id, user.role)?;
        track_token_issued();
        Ok(token)
    }

    #[instrument(skip(db, dto, codec), fields(username = ?dto.username))]
    pub async fn register(
        db: &PgPool,
        codec: &TokenCodec,
        dto: RegisterRequest,
        salt_rounds: u32,
    ) -> Result<AuthResponse, AppError> {
        let username = dto.username.unwrap_or_default();
        let password = dto.password.unwrap_or_default();
        let role = dto.role.unwrap_or_default();

        let existing: Option<(uuid::Uuid,)> = sqlx::query_as(
            "SELECT id FROM users WHERE username = $1 OR (email IS NOT NULL AND email = $2) LIMIT 1",
        )
        .bind(&username)
        .bind(&dto.email)
        .fetch_optional(db)
        .await?;

        if existing.is_some() {
            return Err(AppError::conflict(anyhow!("Username or email already exists")));
        }

        let password_hash = hash_password_with_cost(&password, salt_rounds)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role, first_name, last_name, phone, class_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&username)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.phone)
        .bind(&dto.class_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!("Username or email already exists"))
            } else {
                AppError::database(e)
            }
        })?;

        let user = row.into_record()?.sanitize();
        let token = Self::issue_token(codec, &user)?;

        track_user_registered(role.as_str());
        tracing::info!(user_id = %user.id, role = %role, "User registered");

        Ok(AuthResponse {
            ok: true,
            token,
            user,
        })
    }

    #[instrument(skip(db, dto, codec), fields(login = ?dto.login()))]
    pub async fn login(
        db: &PgPool,
        codec: &TokenCodec,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let login = dto.login().unwrap_or_default();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $1 ORDER BY (username = $1) DESC LIMIT 1",
            USER_COLUMNS
        ))
        .bind(login)
        .fetch_optional(db)
        .await?;

        let Some(row) = row else {
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(dto.password(), &row.password_hash)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = row.into_record()?.sanitize();
        let token = Self::issue_token(codec, &user)?;

        track_login_success(user.role.as_str());
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            ok: true,
            token,
            user,
        })
    }

    /// Creates an admin account outside the HTTP surface.
    pub async fn create_admin(
        db: &PgPool,
        username: &str,
        email: Option<&str>,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        salt_rounds: u32,
    ) -> Result<UserProfile, AppError> {
        let password_hash = hash_password_with_cost(password, salt_rounds)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(Role::Admin.as_str())
        .bind(first_name)
        .bind(last_name)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!("Username or email already exists"))
            } else {
                AppError::database(e)
            }
        })?;

        Ok(row.into_record()?.sanitize())
    }
}
