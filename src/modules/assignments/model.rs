use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use examguard_core::AppError;
use examguard_core::serde::{deserialize_optional_trimmed, parse_flexible_date};

use crate::utils::upload::{FileField, StoredFile, UploadForm};

pub const ATTACHMENT_FIELDS: [FileField; 1] = [FileField::new("attachments", 6)];
pub const SUBMISSION_FIELDS: [FileField; 1] = [FileField::new("files", 6)];

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub class_id: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    #[schema(value_type = Vec<StoredFile>)]
    pub attachments: Json<Vec<StoredFile>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Option<Uuid>,
    #[schema(value_type = Vec<StoredFile>)]
    pub files: Json<Vec<StoredFile>>,
    pub text: Option<String>,
    pub graded: bool,
    pub grade: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub class_id: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
}

impl NewAssignment {
    pub fn from_form(form: &UploadForm) -> Result<Self, AppError> {
        let title = form
            .text("title")
            .ok_or_else(|| AppError::bad_request(anyhow!("title is required")))?;

        let due = form
            .text("due")
            .map(|v| parse_flexible_date(&v).ok_or_else(|| AppError::bad_request(anyhow!("due is invalid"))))
            .transpose()?;

        Ok(Self {
            title,
            class_id: form.text("classId"),
            description: form.text("description"),
            due,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignmentFilter {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub class_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub ok: bool,
    pub assignment: Assignment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentListResponse {
    pub ok: bool,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentSubmissionResponse {
    pub ok: bool,
    pub submission: AssignmentSubmission,
}
