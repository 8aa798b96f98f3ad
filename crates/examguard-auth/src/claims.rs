//! Token claim structures.
//!
//! - [`Claims`]: what this service signs
//! - [`TokenPayload`]: what it accepts when verifying, which also covers
//!   tokens minted by older clients that put the user id under `id` or
//!   `userId` instead of `sub`

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::role::Role;

/// Claims embedded in every token issued by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub role: Role,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds), always after `iat`
    pub exp: i64,
}

/// Decoded view of a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenPayload {
    #[serde(default, deserialize_with = "string_or_number")]
    pub sub: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, rename = "userId", deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
}

impl From<Claims> for TokenPayload {
    fn from(claims: Claims) -> Self {
        Self {
            sub: Some(claims.sub),
            id: None,
            user_id: None,
            role: Some(claims.role),
            iat: Some(claims.iat),
            exp: claims.exp,
        }
    }
}

/// Subject ids are strings, but some issuers emit numeric ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "u1".to_string(),
            role: Role::Teacher,
            iat: 100,
            exp: 200,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"u1""#));
        assert!(serialized.contains(r#""role":"teacher""#));
    }

    #[test]
    fn test_payload_accepts_alternate_subject_names() {
        let by_id: TokenPayload = serde_json::from_str(r#"{"id":"u1","exp":9}"#).unwrap();
        assert_eq!(by_id.id.as_deref(), Some("u1"));
        assert!(by_id.sub.is_none());

        let by_user_id: TokenPayload =
            serde_json::from_str(r#"{"userId":"u1","exp":9}"#).unwrap();
        assert_eq!(by_user_id.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_payload_numeric_subject() {
        let payload: TokenPayload = serde_json::from_str(r#"{"id":42,"exp":9}"#).unwrap();
        assert_eq!(payload.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_payload_role_optional() {
        let payload: TokenPayload = serde_json::from_str(r#"{"sub":"u1","exp":9}"#).unwrap();
        assert!(payload.role.is_none());
        assert!(payload.iat.is_none());
    }

    #[test]
    fn test_payload_rejects_unknown_role() {
        let result: Result<TokenPayload, _> =
            serde_json::from_str(r#"{"sub":"u1","role":"root","exp":9}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_requires_exp() {
        let result: Result<TokenPayload, _> = serde_json::from_str(r#"{"sub":"u1"}"#);
        assert!(result.is_err());
    }
}
