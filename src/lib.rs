//! # ExamGuard API
//!
//! School portal backend built with Axum and PostgreSQL: admission
//! applications with document uploads, exam submissions and results,
//! assignments, fee invoices, messaging, timetables, shared resources and a
//! student dashboard.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── examguard-core/     # AppError, pagination, passwords, file storage
//! ├── examguard-config/   # Environment-driven configuration sections
//! ├── examguard-db/       # Pool setup and embedded migrations
//! └── examguard-auth/     # Token codec, identity resolver, auth pipeline, role gate
//! src/
//! ├── cli/                # Operator commands (create-admin)
//! ├── middleware/         # authenticate + role gate wiring, AuthUser extractor
//! ├── modules/            # Feature modules (controller/model/router/service)
//! └── utils/              # Id parsing, client IP, multipart uploads
//! ```
//!
//! ## Authentication
//!
//! Every protected route runs the auth pipeline first: the token is taken
//! from `Authorization: Bearer` or the token cookie, verified (HS256, expiry),
//! resolved into an [`examguard_auth::Identity`] and attached to the request.
//! Route groups then pass through a role gate. Missing or bad tokens give
//! 401; a valid identity without a permitted role gives 403.
//!
//! | Role | Typical access |
//! |------|----------------|
//! | admin | everything, including registering other users |
//! | teacher | assignments, results, messages, timetables, resources |
//! | staff | invoices and messages |
//! | student | own invoices, exam and assignment submissions, dashboard |
//!
//! ## API Documentation
//!
//! - Swagger UI: `/swagger-ui`
//! - Scalar: `/scalar`

pub mod cli;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

pub use examguard_auth;
pub use examguard_config;
pub use examguard_core;
pub use examguard_db;
