//! # ExamGuard Core
//!
//! Core types, errors, and utilities for the ExamGuard API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page/pageSize query parameters and paged responses
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Deserialization helpers for form-style input
//! - [`file_storage`]: Upload storage backends and upload policies
//!
//! # Example
//!
//! ```ignore
//! use examguard_core::errors::AppError;
//! use examguard_core::pagination::PageParams;
//! use examguard_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Resource not found"));
//! let hash = hash_password("secure_password")?;
//! let offset = PageParams::default().offset();
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError, UploadPolicy};
pub use pagination::{PageParams, Paginated};
pub use password::{hash_password, hash_password_with_cost, verify_password};
