use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::AppError;

use super::model::{LIST_LIMIT, NewResource, Resource};

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(db, new), fields(title = %new.title))]
    pub async fn create(db: &PgPool, new: NewResource, owner_id: Uuid) -> Result<Resource, AppError> {
        let resource = sqlx::query_as::<_, Resource>(
            "INSERT INTO resources (title, resource_type, url, owner_id, meta)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.resource_type)
        .bind(&new.url)
        .bind(owner_id)
        .bind(Json(&new.meta))
        .fetch_one(db)
        .await?;

        tracing::info!(resource_id = %resource.id, "Resource uploaded");
        Ok(resource)
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, resource_type: Option<&str>) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources
             WHERE ($1::text IS NULL OR resource_type = $1)
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(resource_type)
        .bind(LIST_LIMIT)
        .fetch_all(db)
        .await?;
        Ok(resources)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Not found")))
    }
}
