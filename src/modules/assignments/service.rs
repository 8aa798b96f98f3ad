use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::AppError;

use crate::utils::upload::StoredFile;

use super::model::{Assignment, AssignmentSubmission, NewAssignment};

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, new, attachments), fields(title = %new.title))]
    pub async fn create(
        db: &PgPool,
        new: NewAssignment,
        attachments: Vec<StoredFile>,
        created_by: Uuid,
    ) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments (title, class_id, description, due, attachments, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.class_id)
        .bind(&new.description)
        .bind(new.due)
        .bind(Json(&attachments))
        .bind(created_by)
        .fetch_one(db)
        .await?;

        tracing::info!(assignment_id = %assignment.id, "Assignment created");
        Ok(assignment)
    }

    /// Earliest due date first; undated assignments last.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, class_id: Option<&str>) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments
             WHERE ($1::text IS NULL OR class_id = $1)
             ORDER BY due ASC NULLS LAST, created_at ASC",
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;
        Ok(assignments)
    }

    /// Upcoming work for a class, used by the student dashboard.
    pub async fn upcoming_for_class(
        db: &PgPool,
        class_id: &str,
        limit: i64,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE class_id = $1
             ORDER BY due ASC NULLS LAST LIMIT $2",
        )
        .bind(class_id)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(assignments)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM assignments WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(exists)
    }

    #[instrument(skip(db, files, text))]
    pub async fn submit(
        db: &PgPool,
        assignment_id: Uuid,
        student_id: Uuid,
        files: Vec<StoredFile>,
        text: Option<String>,
    ) -> Result<AssignmentSubmission, AppError> {
        let submission = sqlx::query_as::<_, AssignmentSubmission>(
            "INSERT INTO assignment_submissions (assignment_id, student_id, files, text)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(assignment_id)
        .bind(student_id)
        .bind(Json(&files))
        .bind(&text)
        .fetch_one(db)
        .await?;

        tracing::info!(submission_id = %submission.id, "Assignment submitted");
        Ok(submission)
    }

    pub fn not_found() -> AppError {
        AppError::not_found(anyhow!("Assignment not found"))
    }
}
