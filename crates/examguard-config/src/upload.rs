use std::path::PathBuf;

use crate::env;

const MB: usize = 1024 * 1024;

/// Where uploaded files live and how large they may be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// Public mount point for stored files.
    pub url_prefix: String,
    /// Identity documents and transcripts on applications.
    pub document_max_bytes: usize,
    /// Assignment attachments, submission files and resources.
    pub attachment_max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            url_prefix: "/uploads".to_string(),
            document_max_bytes: 8 * MB,
            attachment_max_bytes: 20 * MB,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            url_prefix: defaults.url_prefix,
            document_max_bytes: env::parse_or("UPLOAD_DOCUMENT_MAX_BYTES", defaults.document_max_bytes),
            attachment_max_bytes: env::parse_or(
                "UPLOAD_ATTACHMENT_MAX_BYTES",
                defaults.attachment_max_bytes,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.dir, PathBuf::from("uploads"));
        assert_eq!(config.url_prefix, "/uploads");
        assert_eq!(config.document_max_bytes, 8 * 1024 * 1024);
        assert_eq!(config.attachment_max_bytes, 20 * 1024 * 1024);
    }
}
