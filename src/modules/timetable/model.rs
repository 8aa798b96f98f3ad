use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use examguard_core::serde::deserialize_optional_trimmed;

/// One lesson slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimetableEntry {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: Uuid,
    pub class_id: String,
    #[schema(value_type = Vec<TimetableEntry>)]
    pub entries: Json<Vec<TimetableEntry>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimetableRequest {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(required(message = "classId required"))]
    pub class_id: Option<String>,
    /// Replaces the stored entries. Missing means an empty timetable.
    #[serde(default)]
    pub entries: Vec<TimetableEntry>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimetableQuery {
    /// Class to look up. Defaults to the caller's own class.
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub class: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimetableEntriesResponse {
    pub ok: bool,
    pub timetable: Vec<TimetableEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimetableResponse {
    pub ok: bool,
    pub timetable: Timetable,
}
