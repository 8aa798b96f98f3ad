use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use examguard_core::AppError;
use examguard_core::serde::deserialize_optional_trimmed;

pub const DEFAULT_MAX_SCORE: f64 = 100.0;
/// Cap on the unpaged submissions list.
pub const LIST_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    #[default]
    Submitted,
    Published,
    Flagged,
    Declined,
}

impl std::str::FromStr for SubmissionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "published" => Ok(Self::Published),
            "flagged" => Ok(Self::Flagged),
            "declined" => Ok(Self::Declined),
            _ => Err(AppError::bad_request(anyhow!("status is invalid"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub student_id: Option<Uuid>,
    pub exam_id: String,
    #[schema(value_type = Object)]
    pub answers: Json<Value>,
    pub score: f64,
    pub max: f64,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SubmitExamRequest {
    /// Free-form answer sheet, stored as given.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Option<Value>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "score must not be negative"))]
    pub score: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "max must not be negative"))]
    pub max: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubmissionRequest {
    #[serde(default)]
    #[validate(range(min = 0.0, message = "score must not be negative"))]
    pub score: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "max must not be negative"))]
    pub max: Option<f64>,
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: SubmissionStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubmissionFilter {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub exam_id: Option<String>,
    /// Student user id (UUID).
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub student_id: Option<String>,
}

impl SubmissionFilter {
    pub fn student_id(&self) -> Result<Option<Uuid>, AppError> {
        self.student_id
            .as_deref()
            .map(|s| Uuid::parse_str(s).map_err(|_| AppError::bad_request(anyhow!("studentId is invalid"))))
            .transpose()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResultsFilter {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub exam_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub status: Option<String>,
}

impl ResultsFilter {
    pub fn status(&self) -> Result<Option<SubmissionStatus>, AppError> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub ok: bool,
    pub submission: Submission,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionListResponse {
    pub ok: bool,
    pub submissions: Vec<Submission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        assert_eq!("Published".parse::<SubmissionStatus>().unwrap(), SubmissionStatus::Published);
        assert!("graded".parse::<SubmissionStatus>().is_err());
        let json = serde_json::to_string(&SubmissionStatus::Flagged).unwrap();
        assert_eq!(json, r#""flagged""#);
    }

    #[test]
    fn test_negative_score_is_rejected() {
        let dto: SubmitExamRequest = serde_json::from_str(r#"{"score":-1}"#).unwrap();
        assert!(dto.validate().is_err());
        let dto: SubmitExamRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_unknown_status_fails_to_deserialize() {
        let result: Result<UpdateStatusRequest, _> = serde_json::from_str(r#"{"status":"graded"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_student_id_must_be_uuid() {
        let filter = SubmissionFilter {
            exam_id: None,
            student_id: Some("nope".into()),
        };
        assert!(filter.student_id().is_err());

        let id = Uuid::new_v4();
        let filter = SubmissionFilter {
            exam_id: None,
            student_id: Some(id.to_string()),
        };
        assert_eq!(filter.student_id().unwrap(), Some(id));
    }
}
