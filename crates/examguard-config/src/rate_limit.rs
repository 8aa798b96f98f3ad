//! Rate limiting configuration for API endpoints.
//!
//! Two per-IP token buckets are configured with the Governor crate:
//!
//! - a general bucket applied to the whole API,
//! - a stricter bucket applied to `/api/auth` to slow down credential guessing.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` to disable both limiters (default: true)
//! - `RATE_LIMIT_GLOBAL`: Requests per minute per IP for general endpoints (default: 300)
//! - `RATE_LIMIT_AUTH`: Requests per hour per IP for auth endpoints (default: 30)
//!
//! The limits are expressed as a replenish interval plus a burst size, so
//! `RATE_LIMIT_GLOBAL=300` allows a burst of 300 requests and then one new
//! request every 200ms.
//!
//! # Example
//!
//! ```ignore
//! use examguard_config::RateLimitConfig;
//!
//! let config = RateLimitConfig::from_env();
//! let governor = config.general_governor_config()?;
//! let app = Router::new().layer(GovernorLayer::new(governor));
//! ```

use anyhow::anyhow;
use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

use crate::env;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

pub type IpGovernorConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests allowed per minute per IP on general endpoints.
    pub general_per_minute: u32,

    /// Requests allowed per hour per IP on auth endpoints.
    pub auth_per_hour: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_minute: 300,
            auth_per_hour: 30,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed. Zero is treated as unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::flag_or("RATE_LIMIT_ENABLED", defaults.enabled),
            general_per_minute: positive(env::parse_or("RATE_LIMIT_GLOBAL", 0))
                .unwrap_or(defaults.general_per_minute),
            auth_per_hour: positive(env::parse_or("RATE_LIMIT_AUTH", 0))
                .unwrap_or(defaults.auth_per_hour),
        }
    }

    /// Config that turns both limiters off, for in-process tests where no
    /// peer address is available.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Milliseconds between token replenishments on general endpoints.
    pub fn general_interval_ms(&self) -> u64 {
        interval_ms(MINUTE_MS, self.general_per_minute)
    }

    /// Milliseconds between token replenishments on auth endpoints.
    pub fn auth_interval_ms(&self) -> u64 {
        interval_ms(HOUR_MS, self.auth_per_hour)
    }

    /// Creates a `GovernorConfig` for general API endpoints, keyed by peer IP.
    pub fn general_governor_config(&self) -> anyhow::Result<IpGovernorConfig> {
        build(self.general_interval_ms(), self.general_per_minute)
            .ok_or_else(|| anyhow!("Failed to build general rate limiter config"))
    }

    /// Creates the stricter `GovernorConfig` for authentication endpoints.
    pub fn auth_governor_config(&self) -> anyhow::Result<IpGovernorConfig> {
        build(self.auth_interval_ms(), self.auth_per_hour)
            .ok_or_else(|| anyhow!("Failed to build auth rate limiter config"))
    }
}

fn positive(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}

fn interval_ms(window_ms: u64, allowed: u32) -> u64 {
    (window_ms / u64::from(allowed.max(1))).max(1)
}

fn build(interval_ms: u64, burst: u32) -> Option<IpGovernorConfig> {
    GovernorConfigBuilder::default()
        .per_millisecond(interval_ms)
        .burst_size(burst.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}
