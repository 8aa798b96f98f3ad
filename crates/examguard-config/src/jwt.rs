//! Token signing configuration.
//!
//! - `JWT_SECRET`: HMAC secret. Required when `APP_ENV=production`; a fixed
//!   development secret is used otherwise.
//! - `JWT_EXPIRES_IN`: token lifetime, either plain seconds (`3600`) or a
//!   number with a `d`/`h`/`m`/`s` suffix (`7d`). Default: 7 days.
//! - `JWT_COOKIE_NAME`: cookie consulted when no bearer header is sent
//!   (default: `token`).
//! - `AUTH_RESOLVE_USER`: load the user record for every authenticated
//!   request (default: true).

use anyhow::{anyhow, bail};

use crate::env;
use crate::server::AppEnv;

pub const DEFAULT_EXPIRES_IN_SECS: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_COOKIE_NAME: &str = "token";
const DEVELOPMENT_SECRET: &str = "change-this-secret";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_secs: i64,
    pub cookie_name: String,
    pub resolve_user: bool,
}

impl JwtConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(env::var)
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if app_env.is_production() => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            None => DEVELOPMENT_SECRET.to_string(),
        };

        let expires_in_secs = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration_secs(&raw)
                .ok_or_else(|| anyhow!("Invalid JWT_EXPIRES_IN value: {}", raw))?,
            None => DEFAULT_EXPIRES_IN_SECS,
        };

        Ok(Self {
            secret,
            expires_in_secs,
            cookie_name: lookup("JWT_COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            resolve_user: lookup("AUTH_RESOLVE_USER")
                .map(|v| env::parse_bool(&v))
                .unwrap_or(true),
        })
    }

    /// Config with an explicit secret and all other values defaulted.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            resolve_user: true,
        }
    }

    pub fn uses_development_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Parses `3600`, `45s`, `30m`, `12h` or `7d` into seconds. Rejects zero,
/// negatives and unknown suffixes.
pub fn parse_duration_secs(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return None,
    };
    let value: i64 = digits.trim().parse().ok()?;
    if value <= 0 {
        return None;
    }
    value.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("3600"), Some(3600));
        assert_eq!(parse_duration_secs("45s"), Some(45));
        assert_eq!(parse_duration_secs("30m"), Some(1800));
        assert_eq!(parse_duration_secs("12h"), Some(43_200));
        assert_eq!(parse_duration_secs("7d"), Some(604_800));
        assert_eq!(parse_duration_secs("7D"), Some(604_800));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration_secs(""), None);
        assert_eq!(parse_duration_secs("0"), None);
        assert_eq!(parse_duration_secs("-5m"), None);
        assert_eq!(parse_duration_secs("7w"), None);
        assert_eq!(parse_duration_secs("d"), None);
        assert_eq!(parse_duration_secs("soon"), None);
    }

    #[test]
    fn test_defaults_in_development() {
        let config = JwtConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.uses_development_secret());
        assert_eq!(config.expires_in_secs, 604_800);
        assert_eq!(config.cookie_name, "token");
        assert!(config.resolve_user);
    }

    #[test]
    fn test_production_requires_secret() {
        let result = JwtConfig::from_lookup(lookup_from(&[("APP_ENV", "production")]));
        assert!(result.is_err());

        let config = JwtConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();
        assert_eq!(config.secret, "s3cr3t");
    }

    #[test]
    fn test_overrides() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_EXPIRES_IN", "2h"),
            ("JWT_COOKIE_NAME", "eg_session"),
            ("AUTH_RESOLVE_USER", "false"),
        ]))
        .unwrap();
        assert_eq!(config.expires_in_secs, 7200);
        assert_eq!(config.cookie_name, "eg_session");
        assert!(!config.resolve_user);
    }

    #[test]
    fn test_invalid_lifetime_is_an_error() {
        let result = JwtConfig::from_lookup(lookup_from(&[("JWT_EXPIRES_IN", "forever")]));
        assert!(result.is_err());
    }
}
