use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use examguard_core::AppError;
use examguard_core::serde::parse_flexible_date;

use crate::utils::upload::{FileField, StoredFile, UploadForm};

pub const ID_FILE_FIELD: &str = "idFile";
pub const TRANSCRIPTS_FIELD: &str = "transcripts";

pub const FILE_FIELDS: [FileField; 2] = [
    FileField::new(ID_FILE_FIELD, 1),
    FileField::new(TRANSCRIPTS_FIELD, 10),
];

const REQUIRED_FIELDS: [&str; 5] = ["username", "password", "firstName", "lastName", "email"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ApplicantType {
    #[default]
    National,
    International,
}

impl std::str::FromStr for ApplicantType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(Self::National),
            "international" => Ok(Self::International),
            _ => Err(AppError::bad_request(anyhow!("applicantType is invalid"))),
        }
    }
}

impl ApplicantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::International => "international",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ApplicationStatus {
    Draft,
    #[default]
    Submitted,
    Reviewing,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub applicant_type: ApplicantType,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<DateTime<Utc>>,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub intake_term: Option<String>,
    pub program: Option<String>,
    pub current_school: Option<String>,
    pub current_grade: Option<String>,
    pub prev_academics: Option<String>,
    pub id_files: Json<Vec<StoredFile>>,
    pub transcripts: Json<Vec<StoredFile>>,
    pub language_proof: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub agree: bool,
    pub status: ApplicationStatus,
    pub source_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uploaded document as shown to applicants: no server paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: usize,
}

impl From<StoredFile> for FileSummary {
    fn from(file: StoredFile) -> Self {
        Self {
            filename: file.filename,
            original_name: file.original_name,
            mime_type: file.mime_type,
            size: file.size,
        }
    }
}

/// An application without credentials, file paths or the source address.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub applicant_type: ApplicantType,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<DateTime<Utc>>,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub intake_term: Option<String>,
    pub program: Option<String>,
    pub current_school: Option<String>,
    pub current_grade: Option<String>,
    pub prev_academics: Option<String>,
    pub id_files: Vec<FileSummary>,
    pub transcripts: Vec<FileSummary>,
    pub language_proof: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub agree: bool,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id,
            applicant_type: row.applicant_type,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            dob: row.dob,
            email: row.email,
            phone: row.phone,
            nationality: row.nationality,
            address: row.address,
            intake_term: row.intake_term,
            program: row.program,
            current_school: row.current_school,
            current_grade: row.current_grade,
            prev_academics: row.prev_academics,
            id_files: row.id_files.0.into_iter().map(FileSummary::from).collect(),
            transcripts: row.transcripts.0.into_iter().map(FileSummary::from).collect(),
            language_proof: row.language_proof,
            emergency_name: row.emergency_name,
            emergency_phone: row.emergency_phone,
            agree: row.agree,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated text fields of an application form.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub applicant_type: ApplicantType,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<DateTime<Utc>>,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub intake_term: Option<String>,
    pub program: Option<String>,
    pub current_school: Option<String>,
    pub current_grade: Option<String>,
    pub prev_academics: Option<String>,
    pub language_proof: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
    pub agree: bool,
}

fn required(form: &UploadForm, name: &str) -> Result<String, AppError> {
    form.text(name)
        .ok_or_else(|| AppError::bad_request(anyhow!("{} is required", name)))
}

impl NewApplication {
    /// Accepts both camelCase and the kebab-case names used by the HTML form.
    pub fn from_form(form: &UploadForm) -> Result<Self, AppError> {
        for name in REQUIRED_FIELDS {
            required(form, name)?;
        }

        let applicant_type = form
            .text_any(&["applicantType", "applicant-type"])
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let dob = form
            .text("dob")
            .map(|v| parse_flexible_date(&v).ok_or_else(|| AppError::bad_request(anyhow!("dob is invalid"))))
            .transpose()?;

        let agree = form
            .text("agree")
            .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "on"));

        Ok(Self {
            applicant_type,
            username: required(form, "username")?,
            password: form.raw("password").unwrap_or_default().to_string(),
            first_name: required(form, "firstName")?,
            last_name: required(form, "lastName")?,
            dob,
            email: required(form, "email")?,
            phone: form.text("phone"),
            nationality: form.text("nationality"),
            address: form.text("address"),
            intake_term: form.text_any(&["intakeTerm", "intake-term"]),
            program: form.text("program"),
            current_school: form.text_any(&["currentSchool", "current-school"]),
            current_grade: form.text_any(&["currentGrade", "current-grade"]),
            prev_academics: form.text_any(&["prevAcademics", "prev-academics"]),
            language_proof: form.text_any(&["languageProof", "language-proof"]),
            emergency_name: form.text_any(&["emergencyName", "emergency-name"]),
            emergency_phone: form.text_any(&["emergencyPhone", "emergency-phone"]),
            agree,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicationReceipt {
    pub id: Uuid,
    pub username: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationCreatedResponse {
    pub ok: bool,
    pub application: ApplicationReceipt,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub ok: bool,
    pub application: Application,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicant_type_parsing() {
        assert_eq!("International".parse::<ApplicantType>().unwrap(), ApplicantType::International);
        assert_eq!(" national ".parse::<ApplicantType>().unwrap(), ApplicantType::National);
        assert!("martian".parse::<ApplicantType>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Reviewing).unwrap();
        assert_eq!(json, r#""reviewing""#);
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Submitted);
    }

    #[test]
    fn test_file_summary_drops_path() {
        let summary = FileSummary::from(StoredFile {
            filename: "1-abc-id.pdf".into(),
            original_name: "id.pdf".into(),
            mime_type: "application/pdf".into(),
            size: 10,
            path: "/uploads/applications/1-abc-id.pdf".into(),
        });
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("path"));
        assert!(json.contains(r#""originalName":"id.pdf""#));
    }
}
