use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use examguard_core::serde::deserialize_optional_trimmed;

use crate::utils::upload::{FileField, StoredFile};

pub const FILE_FIELDS: [FileField; 1] = [FileField::new("file", 1)];
pub const LIST_LIMIT: i64 = 200;

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub url: String,
    pub owner_id: Option<Uuid>,
    /// `originalName`, `size` and `mime` of the uploaded file.
    #[schema(value_type = Object)]
    pub meta: Json<Value>,
    pub created_at: DateTime<Utc>,
}

/// A resource ready to insert. Title and type fall back to the file's
/// original name and MIME type.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub resource_type: String,
    pub url: String,
    pub meta: Value,
}

impl NewResource {
    pub fn new(title: Option<String>, resource_type: Option<String>, file: &StoredFile) -> Self {
        Self {
            title: title.unwrap_or_else(|| file.original_name.clone()),
            resource_type: resource_type.unwrap_or_else(|| file.mime_type.clone()),
            url: file.path.clone(),
            meta: json!({
                "originalName": file.original_name,
                "size": file.size,
                "mime": file.mime_type,
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceFilter {
    #[serde(default, rename = "type", deserialize_with = "deserialize_optional_trimmed")]
    #[param(rename = "type")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResourceResponse {
    pub ok: bool,
    pub resource: Resource,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResourceListResponse {
    pub ok: bool,
    pub resources: Vec<Resource>,
}
