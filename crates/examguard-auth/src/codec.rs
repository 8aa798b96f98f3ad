//! HS256 token signing and verification.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use examguard_config::JwtConfig;
use examguard_core::AppError;

use crate::claims::{Claims, TokenPayload};
use crate::error::AuthError;
use crate::role::Role;

/// Signs and verifies tokens with a fixed secret and lifetime.
///
/// Built once at startup and shared behind an `Arc`; the secret is never
/// rotated while the process runs.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetime_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at` with no
        // leeway; jsonwebtoken only enforces that the claim is present.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime_secs,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.expires_in_secs)
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issues a token for `subject` with `iat = now` and `exp = now + lifetime`.
    pub fn sign(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.sign_at(subject, role, Utc::now().timestamp())
    }

    pub fn sign_at(&self, subject: &str, role: Role, now: i64) -> Result<String, AppError> {
        if subject.trim().is_empty() {
            return Err(AppError::internal_error(
                "Refusing to sign a token without a subject".to_string(),
            ));
        }
        if self.lifetime_secs <= 0 {
            return Err(AppError::internal_error(
                "Token lifetime must be positive".to_string(),
            ));
        }

        let exp = now.checked_add(self.lifetime_secs).ok_or_else(|| {
            AppError::internal_error("Token lifetime overflows the expiry time".to_string())
        })?;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
    }

    /// Checks signature and expiry. Every failure is [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<TokenPayload, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenPayload, AuthError> {
        let payload = decode::<TokenPayload>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        if now >= payload.exp {
            tracing::debug!(exp = payload.exp, now, "Token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(payload)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::normalize;

    const SECRET: &[u8] = b"test-secret";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 604_800)
    }

    fn forge(payload: serde_json::Value, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_sign_then_verify() {
        let codec = codec();
        let token = codec.sign("u1", Role::Teacher).unwrap();
        let payload = codec.verify(&token).unwrap();

        let identity = normalize(&payload).unwrap();
        assert_eq!(identity.subject, "u1");
        assert_eq!(identity.role, Some(Role::Teacher));
    }

    #[test]
    fn test_expiry_is_lifetime_after_issue() {
        let codec = TokenCodec::new(SECRET, 3600);
        let token = codec.sign_at("u1", Role::Student, 1_000).unwrap();
        let payload = codec.verify_at(&token, 1_001).unwrap();
        assert_eq!(payload.iat, Some(1_000));
        assert_eq!(payload.exp, 4_600);
    }

    #[test]
    fn test_expiry_has_no_leeway() {
        let codec = TokenCodec::new(SECRET, 60);
        let token = codec.sign_at("u1", Role::Student, 1_000).unwrap();

        assert!(codec.verify_at(&token, 1_059).is_ok());
        assert_eq!(codec.verify_at(&token, 1_060), Err(AuthError::InvalidToken));
        assert_eq!(codec.verify_at(&token, 5_000), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_and_tampered_look_identical() {
        let codec = codec();
        let now = Utc::now().timestamp();

        let expired = codec
            .sign_at("u1", Role::Admin, now - 2 * codec.lifetime_secs())
            .unwrap();
        let tampered = forge(
            serde_json::json!({"sub": "u1", "role": "admin", "iat": now, "exp": now + 60}),
            b"someone-elses-secret",
        );

        let expired_err = codec.verify(&expired).unwrap_err();
        let tampered_err = codec.verify(&tampered).unwrap_err();
        assert_eq!(expired_err, tampered_err);
        assert_eq!(expired_err.message(), tampered_err.message());
    }

    #[test]
    fn test_modified_payload_is_rejected() {
        let codec = codec();
        let token = codec.sign("u1", Role::Student).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let elevated = forge(
            serde_json::json!({"sub": "u1", "role": "admin", "exp": Utc::now().timestamp() + 60}),
            b"other",
        );
        parts[1] = elevated.split('.').nth(1).unwrap().to_string();

        assert_eq!(codec.verify(&parts.join(".")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = codec();
        assert_eq!(codec.verify("not.a.jwt"), Err(AuthError::InvalidToken));
        assert_eq!(codec.verify(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_missing_exp_is_rejected() {
        let codec = codec();
        let token = forge(serde_json::json!({"sub": "u1"}), SECRET);
        assert_eq!(codec.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_foreign_subject_claims_verify() {
        let codec = codec();
        let exp = Utc::now().timestamp() + 60;
        let token = forge(serde_json::json!({"userId": "u9", "exp": exp}), SECRET);
        let payload = codec.verify(&token).unwrap();
        assert_eq!(normalize(&payload).unwrap().subject, "u9");
    }

    #[test]
    fn test_empty_subject_is_not_signed() {
        assert!(codec().sign("  ", Role::Student).is_err());
    }

    #[test]
    fn test_overflowing_lifetime_is_not_signed() {
        let codec = TokenCodec::new(SECRET, i64::MAX - 10);
        let err = codec.sign("u1", Role::Student).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_config_uses_lifetime() {
        let mut config = JwtConfig::with_secret("abc");
        config.expires_in_secs = 120;
        assert_eq!(TokenCodec::from_config(&config).lifetime_secs(), 120);
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains("test-secret"));
    }
}
