use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::{AppError, FileStorage, hash_password_with_cost, verify_password};

use crate::metrics::track_application_submitted;
use crate::modules::auth::model::LoginRequest;
use crate::modules::auth::service::is_unique_violation;
use crate::utils::upload::UploadForm;

use super::model::{
    Application, ApplicationReceipt, ApplicationRow, ApplicationStatus, ID_FILE_FIELD,
    NewApplication, TRANSCRIPTS_FIELD,
};

const USERNAME_TAKEN: &str = "Username already in use";

pub struct ApplicationService;

impl ApplicationService {
    async fn username_taken(db: &PgPool, username: &str) -> Result<bool, AppError> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE username = $1)")
                .bind(username)
                .fetch_one(db)
                .await?;
        Ok(taken)
    }

    /// Stores the form's documents and records the application. Files are
    /// written only after the form and username have been accepted.
    #[instrument(skip(db, storage, new, form), fields(username = %new.username))]
    pub async fn submit<S: FileStorage + ?Sized>(
        db: &PgPool,
        storage: &S,
        new: NewApplication,
        form: UploadForm,
        source_ip: Option<String>,
        salt_rounds: u32,
    ) -> Result<ApplicationReceipt, AppError> {
        if Self::username_taken(db, &new.username).await? {
            return Err(AppError::conflict(anyhow!(USERNAME_TAKEN)));
        }

        let password_hash = hash_password_with_cost(&new.password, salt_rounds)?;

        let mut files = form.store(storage, "applications").await?;
        let id_files = files.remove(ID_FILE_FIELD).unwrap_or_default();
        let transcripts = files.remove(TRANSCRIPTS_FIELD).unwrap_or_default();

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO applications (
                applicant_type, username, password_hash, first_name, last_name, dob, email,
                phone, nationality, address, intake_term, program, current_school,
                current_grade, prev_academics, id_files, transcripts, language_proof,
                emergency_name, emergency_phone, agree, status, source_ip
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                     $16, $17, $18, $19, $20, $21, $22, $23)
             RETURNING id",
        )
        .bind(new.applicant_type)
        .bind(&new.username)
        .bind(&password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.dob)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.nationality)
        .bind(&new.address)
        .bind(&new.intake_term)
        .bind(&new.program)
        .bind(&new.current_school)
        .bind(&new.current_grade)
        .bind(&new.prev_academics)
        .bind(Json(&id_files))
        .bind(Json(&transcripts))
        .bind(&new.language_proof)
        .bind(&new.emergency_name)
        .bind(&new.emergency_phone)
        .bind(new.agree)
        .bind(ApplicationStatus::Submitted)
        .bind(&source_ip)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!(USERNAME_TAKEN))
            } else {
                AppError::database(e)
            }
        })?;

        track_application_submitted(new.applicant_type.as_str());
        tracing::info!(application_id = %id, documents = id_files.len() + transcripts.len(), "Application submitted");

        Ok(ApplicationReceipt {
            id,
            username: new.username,
            status: ApplicationStatus::Submitted,
        })
    }

    #[instrument(skip(db, dto), fields(login = ?dto.login()))]
    pub async fn login(db: &PgPool, dto: LoginRequest) -> Result<Application, AppError> {
        let login = dto.login().unwrap_or_default();

        let row = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE username = $1 OR email = $1
             ORDER BY (username = $1) DESC, created_at DESC LIMIT 1",
        )
        .bind(login)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(dto.password(), &row.password_hash)? {
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        }

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<Application, AppError> {
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(Application::from)
            .ok_or_else(|| AppError::not_found(anyhow!("Not found")))
    }
}
