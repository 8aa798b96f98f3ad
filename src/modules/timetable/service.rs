use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use examguard_core::AppError;

use super::model::{Timetable, TimetableEntry};

pub struct TimetableService;

impl TimetableService {
    /// Entries for a class, or an empty list when none were saved.
    #[instrument(skip(db))]
    pub async fn entries_for_class(
        db: &PgPool,
        class_id: &str,
    ) -> Result<Vec<TimetableEntry>, AppError> {
        let entries: Option<Json<Vec<TimetableEntry>>> =
            sqlx::query_scalar("SELECT entries FROM timetables WHERE class_id = $1")
                .bind(class_id)
                .fetch_optional(db)
                .await?;
        Ok(entries.map(|Json(e)| e).unwrap_or_default())
    }

    #[instrument(skip(db, entries), fields(entries = entries.len()))]
    pub async fn save(
        db: &PgPool,
        class_id: &str,
        entries: Vec<TimetableEntry>,
    ) -> Result<Timetable, AppError> {
        let timetable = sqlx::query_as::<_, Timetable>(
            "INSERT INTO timetables (class_id, entries, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (class_id)
             DO UPDATE SET entries = EXCLUDED.entries, updated_at = NOW()
             RETURNING *",
        )
        .bind(class_id)
        .bind(Json(&entries))
        .fetch_one(db)
        .await?;

        tracing::info!(class_id, "Timetable saved");
        Ok(timetable)
    }
}
