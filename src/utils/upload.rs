//! Multipart form handling for routes that accept files.
//!
//! A form is read fully into memory and checked against the route's
//! [`UploadPolicy`] and file-field limits before anything touches disk.
//! Handlers validate the text fields first and only then call
//! [`UploadForm::store`], so a rejected form leaves no files behind.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::extract::{Multipart, multipart::MultipartError};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use examguard_core::file_storage::stored_key;
use examguard_core::{AppError, FileStorage, StorageError, UploadPolicy};

use crate::metrics::track_upload_stored;

/// A file input the route accepts and how many files it may carry.
#[derive(Debug, Clone, Copy)]
pub struct FileField {
    pub name: &'static str,
    pub max_count: usize,
}

impl FileField {
    pub const fn new(name: &'static str, max_count: usize) -> Self {
        Self { name, max_count }
    }
}

/// Metadata kept for every stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: usize,
    /// Public URL under the uploads prefix.
    pub path: String,
}

#[derive(Debug)]
struct PendingFile {
    field: String,
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: Vec<PendingFile>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::payload_too_large(anyhow!("Upload too large"));
    }
    AppError::bad_request(anyhow!("Invalid multipart body: {}", err.body_text()))
}

fn storage_error(err: StorageError) -> AppError {
    if err.is_client_error() {
        AppError::bad_request(anyhow!(err))
    } else {
        AppError::internal(anyhow!(err))
    }
}

async fn discard<S: FileStorage + ?Sized>(storage: &S, keys: &[String]) {
    for key in keys {
        if let Err(err) = storage.delete(key).await {
            tracing::warn!(key = %key, error = %err, "Failed to remove partially stored upload");
        }
    }
}

impl UploadForm {
    /// Reads every part of `multipart`. File parts must belong to one of
    /// `file_fields`, stay within its count and pass `policy`.
    pub async fn read(
        mut multipart: Multipart,
        file_fields: &[FileField],
        policy: &UploadPolicy,
    ) -> Result<Self, AppError> {
        let mut form = Self::default();
        let mut counts: HashMap<&'static str, usize> = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(original_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
                continue;
            };

            let spec = file_fields
                .iter()
                .find(|f| f.name == name)
                .ok_or_else(|| AppError::bad_request(anyhow!("Unexpected file field: {}", name)))?;

            let count = counts.entry(spec.name).or_default();
            *count += 1;
            if *count > spec.max_count {
                return Err(AppError::bad_request(anyhow!(
                    "Too many files for field: {}",
                    name
                )));
            }

            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            policy.check(&mime_type, bytes.len()).map_err(storage_error)?;

            form.files.push(PendingFile {
                field: name,
                original_name,
                mime_type,
                bytes: bytes.to_vec(),
            });
        }

        Ok(form)
    }

    /// Trimmed, non-empty text value.
    pub fn text(&self, name: &str) -> Option<String> {
        crate::utils::non_blank(self.fields.get(name).map(String::as_str))
    }

    /// First non-empty value among alternative names (`firstName` or
    /// `first-name` style).
    pub fn text_any(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.text(n))
    }

    /// Raw value, untrimmed. Passwords are taken as typed.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_files(&self, field: &str) -> bool {
        self.files.iter().any(|f| f.field == field)
    }

    /// Writes every pending file below `area` and groups the results by
    /// form field. If any write fails, files already written for this form
    /// are deleted again.
    pub async fn store<S: FileStorage + ?Sized>(
        self,
        storage: &S,
        area: &str,
    ) -> Result<HashMap<String, Vec<StoredFile>>, AppError> {
        let mut stored: HashMap<String, Vec<StoredFile>> = HashMap::new();
        let mut written: Vec<String> = Vec::new();

        for file in self.files {
            let key = stored_key(area, &file.original_name);
            if let Err(err) = storage.save(&key, &file.bytes).await {
                discard(storage, &written).await;
                return Err(storage_error(err));
            }
            written.push(key.clone());

            let path = match storage.get_url(&key) {
                Ok(path) => path,
                Err(err) => {
                    discard(storage, &written).await;
                    return Err(storage_error(err));
                }
            };
            let filename = key.rsplit('/').next().unwrap_or(&key).to_string();

            track_upload_stored(area, file.bytes.len());
            tracing::info!(area, key = %key, size = file.bytes.len(), "Stored uploaded file");

            stored.entry(file.field).or_default().push(StoredFile {
                filename,
                original_name: file.original_name,
                mime_type: file.mime_type,
                size: file.bytes.len(),
                path,
            });
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};
    use examguard_core::LocalFileStorage;

    const BOUNDARY: &str = "XBOUNDARYX";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                            .as_bytes(),
                    );
                }
                Part::File(name, filename, mime, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, filename, mime
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let req = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(req, &()).await.unwrap()
    }

    const ID_FILE: [FileField; 1] = [FileField::new("idFile", 1)];

    #[tokio::test]
    async fn test_reads_text_and_files() {
        let mp = multipart(&[
            Part::Text("username", " ada "),
            Part::Text("first-name", "Ada"),
            Part::File("idFile", "passport scan.pdf", "application/pdf", b"%PDF"),
        ])
        .await;
        let form = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(1024))
            .await
            .unwrap();

        assert_eq!(form.text("username").as_deref(), Some("ada"));
        assert_eq!(form.text_any(&["firstName", "first-name"]).as_deref(), Some("Ada"));
        assert!(form.has_files("idFile"));
    }

    #[tokio::test]
    async fn test_rejects_unexpected_file_field() {
        let mp = multipart(&[Part::File("avatar", "a.png", "image/png", b"png")]).await;
        let err = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(1024))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_too_many_files() {
        let mp = multipart(&[
            Part::File("idFile", "a.pdf", "application/pdf", b"1"),
            Part::File("idFile", "b.pdf", "application/pdf", b"2"),
        ])
        .await;
        let err = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(1024))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("Too many files"));
    }

    #[tokio::test]
    async fn test_rejects_disallowed_mime_type() {
        let mp = multipart(&[Part::File("idFile", "a.txt", "text/plain", b"hi")]).await;
        let err = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(1024))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let mp = multipart(&[Part::File("idFile", "a.pdf", "application/pdf", &[0u8; 32])]).await;
        let err = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(16))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_writes_files_and_reports_urls() {
        let dir = std::env::temp_dir().join(format!("examguard-upload-test-{}", uuid::Uuid::new_v4()));
        let storage = LocalFileStorage::new(dir.clone(), "/uploads".to_string());

        let mp = multipart(&[Part::File("idFile", "My ID.pdf", "application/pdf", b"%PDF-1.4")]).await;
        let form = UploadForm::read(mp, &ID_FILE, &UploadPolicy::documents(1024))
            .await
            .unwrap();
        let stored = form.store(&storage, "applications").await.unwrap();

        let file = &stored["idFile"][0];
        assert!(file.filename.ends_with("-My_ID.pdf"));
        assert_eq!(file.original_name, "My ID.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size, 8);
        assert_eq!(file.path, format!("/uploads/applications/{}", file.filename));
        assert!(dir.join("applications").join(&file.filename).exists());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    /// Local storage that refuses any key whose name mentions `broken`.
    struct BrokenDisk(LocalFileStorage);

    impl FileStorage for BrokenDisk {
        fn save<'a>(
            &'a self,
            key: &'a str,
            content: &'a [u8],
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>
        {
            if key.contains("broken") {
                return Box::pin(async {
                    Err(StorageError::IoError(std::io::Error::other("disk full")))
                });
            }
            self.0.save(key, content)
        }

        fn delete<'a>(
            &'a self,
            key: &'a str,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>
        {
            self.0.delete(key)
        }

        fn get_url(&self, key: &str) -> Result<String, StorageError> {
            self.0.get_url(key)
        }
    }

    #[tokio::test]
    async fn test_failed_store_removes_earlier_files() {
        let dir = std::env::temp_dir().join(format!("examguard-upload-test-{}", uuid::Uuid::new_v4()));
        let storage = BrokenDisk(LocalFileStorage::new(dir.clone(), "/uploads".to_string()));
        let fields = [FileField::new("files", 2)];

        let mp = multipart(&[
            Part::File("files", "notes..v2.pdf", "application/pdf", b"1"),
            Part::File("files", "broken.pdf", "application/pdf", b"2"),
        ])
        .await;
        let form = UploadForm::read(mp, &fields, &UploadPolicy::any(1024))
            .await
            .unwrap();
        let err = form.store(&storage, "assignments").await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let mut leftovers = Vec::new();
        if let Ok(mut entries) = tokio::fs::read_dir(dir.join("assignments")).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                leftovers.push(entry.file_name());
            }
        }
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
