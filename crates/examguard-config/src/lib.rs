//! # ExamGuard Config
//!
//! Configuration types for the ExamGuard API, loaded from environment variables:
//!
//! - [`jwt`]: Token signing secret, lifetime and cookie name
//! - [`cors`]: Allowed origins and credential support
//! - [`rate_limit`]: Per-IP rate limiting for general and auth endpoints
//! - [`server`]: Listen port and runtime environment
//! - [`upload`]: Upload directory and public URL prefix
//! - [`registration`]: Self-registration switch and bcrypt cost
//!
//! # Example
//!
//! ```ignore
//! use examguard_config::{CorsConfig, JwtConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod registration;
pub mod server;
pub mod upload;

mod env;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use registration::RegistrationConfig;
pub use server::{AppEnv, ServerConfig};
pub use upload::UploadConfig;
