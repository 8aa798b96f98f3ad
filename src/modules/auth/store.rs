use sqlx::PgPool;
use uuid::Uuid;

use examguard_auth::{UserStore, UserStoreFuture};

use super::model::{USER_COLUMNS, UserRow};

/// [`UserStore`] over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl UserStore for PgUserStore {
    fn find_by_id<'a>(&'a self, id: &'a str) -> UserStoreFuture<'a> {
        Box::pin(async move {
            // Subjects that are not UUIDs cannot match a row.
            let Ok(id) = Uuid::parse_str(id) else {
                return Ok(None);
            };

            let row = sqlx::query_as::<_, UserRow>(&format!(
                "SELECT {} FROM users WHERE id = $1",
                USER_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

            row.map(UserRow::into_record).transpose()
        })
    }
}
