use anyhow::anyhow;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::{AppError, PageParams, Paginated};

use super::model::{
    DEFAULT_MAX_SCORE, LIST_LIMIT, Submission, SubmissionStatus, SubmitExamRequest,
    UpdateSubmissionRequest,
};

fn not_found() -> AppError {
    AppError::not_found(anyhow!("Submission not found"))
}

pub struct SubmissionService;

impl SubmissionService {
    #[instrument(skip(db, dto))]
    pub async fn submit(
        db: &PgPool,
        student_id: Uuid,
        exam_id: &str,
        dto: SubmitExamRequest,
    ) -> Result<Submission, AppError> {
        let answers: Value = dto.answers.unwrap_or_else(|| json!({}));

        let submission = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (student_id, exam_id, answers, score, max, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(student_id)
        .bind(exam_id)
        .bind(Json(&answers))
        .bind(dto.score.unwrap_or(0.0))
        .bind(dto.max.unwrap_or(DEFAULT_MAX_SCORE))
        .bind(SubmissionStatus::Submitted)
        .fetch_one(db)
        .await?;

        tracing::info!(submission_id = %submission.id, "Exam submitted");
        Ok(submission)
    }

    /// Newest first, capped at [`LIST_LIMIT`].
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        exam_id: Option<&str>,
        student_id: Option<Uuid>,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions
             WHERE ($1::text IS NULL OR exam_id = $1)
               AND ($2::uuid IS NULL OR student_id = $2)
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(exam_id)
        .bind(student_id)
        .bind(LIST_LIMIT)
        .fetch_all(db)
        .await?;
        Ok(submissions)
    }

    /// Applies only the fields present in `dto`.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSubmissionRequest,
    ) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(
            "UPDATE submissions
             SET score = COALESCE($2, score),
                 max = COALESCE($3, max),
                 status = COALESCE($4, status)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(dto.score)
        .bind(dto.max)
        .bind(dto.status)
        .fetch_optional(db)
        .await?
        .ok_or_else(not_found)
    }

    #[instrument(skip(db))]
    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(
            "UPDATE submissions SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?
        .ok_or_else(not_found)
    }

    #[instrument(skip(db))]
    pub async fn results(
        db: &PgPool,
        exam_id: Option<&str>,
        status: Option<SubmissionStatus>,
        params: &PageParams,
    ) -> Result<Paginated<Submission>, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions
             WHERE ($1::text IS NULL OR exam_id = $1)
               AND ($2::text IS NULL OR status = $2)",
        )
        .bind(exam_id)
        .bind(status)
        .fetch_one(db)
        .await?;

        let rows = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions
             WHERE ($1::text IS NULL OR exam_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(exam_id)
        .bind(status)
        .bind(params.page_size())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(Paginated::new(rows, total, params))
    }
}
