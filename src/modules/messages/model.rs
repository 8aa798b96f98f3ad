use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use examguard_core::serde::deserialize_optional_trimmed;

/// Recipients of the form `class:<id>` address a whole class.
pub const CLASS_PREFIX: &str = "class:";
pub const INBOX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Option<Uuid>,
    /// A user id or a `class:` target.
    pub recipient: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub read_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "to is required"))]
    pub to: String,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: Message,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    pub ok: bool,
    pub messages: Vec<Message>,
}
