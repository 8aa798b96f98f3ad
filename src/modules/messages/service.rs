use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::AppError;

use super::model::{CLASS_PREFIX, INBOX_LIMIT, Message, SendMessageRequest};

pub struct MessageService;

impl MessageService {
    #[instrument(skip(db, dto), fields(recipient = %dto.to))]
    pub async fn send(
        db: &PgPool,
        sender_id: Uuid,
        dto: SendMessageRequest,
    ) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, recipient, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(sender_id)
        .bind(dto.to.trim())
        .bind(&dto.subject)
        .bind(&dto.body)
        .fetch_one(db)
        .await?;

        tracing::info!(message_id = %message.id, "Message sent");
        Ok(message)
    }

    /// Messages addressed to `subject` plus every class broadcast, newest first.
    #[instrument(skip(db))]
    pub async fn inbox(db: &PgPool, subject: &str) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE recipient = $1 OR starts_with(recipient, $2)
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(subject)
        .bind(CLASS_PREFIX)
        .bind(INBOX_LIMIT)
        .fetch_all(db)
        .await?;
        Ok(messages)
    }
}
