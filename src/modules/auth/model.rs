use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use examguard_auth::{Identity, Role, UserProfile, UserRecord};
use examguard_core::serde::deserialize_optional_trimmed;

/// Row of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_pic: Option<String>,
    pub class_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const USER_COLUMNS: &str = "id, username, email, password_hash, role, first_name, last_name, \
     phone, profile_pic, class_id, created_at, updated_at";

impl UserRow {
    pub fn into_record(self) -> anyhow::Result<UserRecord> {
        let role: Role = self.role.parse()?;
        Ok(UserRecord {
            profile: UserProfile {
                id: self.id.to_string(),
                username: self.username,
                email: self.email,
                role,
                first_name: self.first_name,
                last_name: self.last_name,
                phone: self.phone,
                profile_pic: self.profile_pic,
                class_id: self.class_id,
                created_at: Some(self.created_at),
                updated_at: Some(self.updated_at),
            },
            password_hash: self.password_hash,
        })
    }
}

pub const CREDENTIALS_REQUIRED: &str = "username and password (min 6) required";
pub const LOGIN_FIELDS_REQUIRED: &str = "username/email and password required";

fn validate_registration(dto: &RegisterRequest) -> Result<(), ValidationError> {
    let username_ok = dto.username.as_deref().is_some_and(|u| !u.is_empty());
    let password_ok = dto.password.as_deref().is_some_and(|p| p.chars().count() >= 6);
    if username_ok && password_ok {
        Ok(())
    } else {
        Err(ValidationError::new("credentials").with_message(CREDENTIALS_REQUIRED.into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_registration"))]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    /// Only admins may register anyone other than a student.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub class_id: Option<String>,
}

fn validate_login(dto: &LoginRequest) -> Result<(), ValidationError> {
    let has_login = dto.login().is_some();
    let has_password = dto.password.as_deref().is_some_and(|p| !p.is_empty());
    if has_login && has_password {
        Ok(())
    } else {
        Err(ValidationError::new("credentials").with_message(LOGIN_FIELDS_REQUIRED.into()))
    }
}

/// Username or email plus password. Used for user and applicant logins.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_login"))]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// The identifier to look up: `username` wins over `email`.
    pub fn login(&self) -> Option<&str> {
        self.username.as_deref().or(self.email.as_deref())
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub ok: bool,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdentityResponse {
    pub ok: bool,
    pub user: Identity,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GreetingResponse {
    pub ok: bool,
    pub message: String,
    pub user: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_username_and_long_password() {
        let dto: RegisterRequest =
            serde_json::from_str(r#"{"username":"  ","password":"secret1"}"#).unwrap();
        let err = dto.validate().unwrap_err();
        assert!(err.to_string().contains(CREDENTIALS_REQUIRED));

        let dto: RegisterRequest =
            serde_json::from_str(r#"{"username":"ada","password":"12345"}"#).unwrap();
        assert!(dto.validate().is_err());

        let dto: RegisterRequest =
            serde_json::from_str(r#"{"username":"ada","password":"123456"}"#).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_blank_email_is_absent() {
        let dto: RegisterRequest =
            serde_json::from_str(r#"{"username":"ada","password":"123456","email":""}"#).unwrap();
        assert!(dto.email.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> =
            serde_json::from_str(r#"{"username":"ada","password":"123456","role":"root"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_login_prefers_username() {
        let dto: LoginRequest =
            serde_json::from_str(r#"{"username":"ada","email":"a@x.io","password":"p"}"#).unwrap();
        assert_eq!(dto.login(), Some("ada"));

        let dto: LoginRequest = serde_json::from_str(r#"{"email":"a@x.io","password":"p"}"#).unwrap();
        assert_eq!(dto.login(), Some("a@x.io"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let dto: LoginRequest = serde_json::from_str(r#"{"username":"ada"}"#).unwrap();
        assert!(dto.validate().is_err());
        let dto: LoginRequest = serde_json::from_str(r#"{"password":"p"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_row_into_record_keeps_hash_out_of_profile() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: None,
            password_hash: "$2b$04$hash".into(),
            role: "teacher".into(),
            first_name: None,
            last_name: None,
            phone: None,
            profile_pic: None,
            class_id: Some("jss1".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let record = row.into_record().unwrap();
        assert_eq!(record.profile.role, Role::Teacher);
        let json = serde_json::to_string(&record.sanitize()).unwrap();
        assert!(!json.contains("hash"));
        assert!(json.contains(r#""classId":"jss1""#));
    }
}
