//! File storage for multipart uploads.
//!
//! Uploaded files are written below a base directory, grouped by area
//! (`applications`, `assignments`, `resources`), and served back under a
//! public URL prefix (`/uploads`). Storage backends implement [`FileStorage`]
//! so handlers never touch the filesystem directly.
//!
//! # Example
//!
//! ```ignore
//! use examguard_core::file_storage::{FileStorage, LocalFileStorage, UploadPolicy};
//!
//! let storage = LocalFileStorage::new(PathBuf::from("./uploads"), "/uploads".to_string());
//! let policy = UploadPolicy::documents(8 * 1024 * 1024);
//!
//! policy.check("application/pdf", bytes.len())?;
//! let key = stored_key("applications", "My Transcript.pdf");
//! storage.save(&key, &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::fs;

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Delete a file by key. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// MIME type not allowed.
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    /// I/O error (file system or similar).
    IoError(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidMimeType { received, allowed } => {
                write!(
                    f,
                    "MIME type '{}' not allowed. Allowed types: {}",
                    received,
                    allowed.join(", ")
                )
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl StorageError {
    /// Whether the client caused the failure (bad size, type or name).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::IoError(_))
    }
}

/// Size and MIME constraints for one upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    /// Empty means any MIME type is accepted.
    pub allowed_mime_types: Vec<String>,
}

impl UploadPolicy {
    /// Identity documents and transcripts: PDF and common image formats.
    pub fn documents(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            allowed_mime_types: ["application/pdf", "image/jpeg", "image/png", "image/jpg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn any(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            allowed_mime_types: Vec::new(),
        }
    }

    pub fn check(&self, mime_type: &str, size: usize) -> Result<(), StorageError> {
        if size > self.max_file_size {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_file_size,
            });
        }

        if !self.allowed_mime_types.is_empty()
            && !self.allowed_mime_types.iter().any(|m| m == mime_type)
        {
            return Err(StorageError::InvalidMimeType {
                received: mime_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(())
    }
}

/// Makes a client filename safe for disk: whitespace runs become `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped and runs of `.` collapse to
/// one, so the result never contains `..`.
pub fn sanitize_filename(original: &str) -> String {
    let mut out = String::with_capacity(original.len());
    let mut in_whitespace = false;
    for c in original.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c == '.' && out.ends_with('.') {
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
            out.push(c);
        }
    }
    // A name made only of dots would resolve to the directory itself.
    if out.chars().all(|c| c == '.') {
        return "file".to_string();
    }
    out
}

/// Builds a unique storage key: `<area>/<millis>-<6 random>-<sanitized name>`.
pub fn stored_key(area: &str, original_name: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!(
        "{}/{}-{}-{}",
        area,
        chrono::Utc::now().timestamp_millis(),
        suffix,
        sanitize_filename(original_name)
    )
}

/// Local filesystem-based file storage implementation.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    /// Base directory where files are stored
    base_dir: PathBuf,

    /// Base URL for public file access (e.g., "/uploads")
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self { base_dir, base_url }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;
            tracing::debug!(key = %key, bytes = content.len(), "Stored upload");

            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);
            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}
