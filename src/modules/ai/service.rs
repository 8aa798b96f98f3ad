use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::AppError;

use super::model::{AiQuiz, GenerateQuizRequest, placeholder_questions};

pub struct AiQuizService;

impl AiQuizService {
    #[instrument(skip(db, dto))]
    pub async fn generate(
        db: &PgPool,
        created_by: Uuid,
        dto: &GenerateQuizRequest,
    ) -> Result<AiQuiz, AppError> {
        let questions = placeholder_questions(dto.topic(), dto.difficulty(), dto.count());

        let quiz = sqlx::query_as::<_, AiQuiz>(
            "INSERT INTO ai_quizzes (topic, difficulty, count, questions, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(dto.topic())
        .bind(dto.difficulty())
        .bind(questions.len() as i32)
        .bind(Json(&questions))
        .bind(created_by)
        .fetch_one(db)
        .await?;

        tracing::info!(quiz_id = %quiz.id, count = quiz.count, "Quiz generated");
        Ok(quiz)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<AiQuiz, AppError> {
        sqlx::query_as::<_, AiQuiz>("SELECT * FROM ai_quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Not found")))
    }

    /// Most recent quizzes a user generated.
    pub async fn recent_for_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AiQuiz>, AppError> {
        let quizzes = sqlx::query_as::<_, AiQuiz>(
            "SELECT * FROM ai_quizzes WHERE created_by = $1
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(quizzes)
    }
}
