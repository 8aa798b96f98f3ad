use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use examguard_core::AppError;

use crate::metrics::track_invoice_payment;
use crate::modules::auth::service::is_unique_violation;

use super::model::{
    CreateInvoiceRequest, DEFAULT_CURRENCY, Invoice, InvoiceStatus, apply_payment,
    default_reference, payment_trace,
};

fn not_found() -> AppError {
    AppError::not_found(anyhow!("Not found"))
}

pub struct InvoiceService;

impl InvoiceService {
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateInvoiceRequest) -> Result<Invoice, AppError> {
        let reference = dto.reference.unwrap_or_else(default_reference);
        let currency = dto
            .currency
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let invoice = sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (ref, student_id, description, due, amount, currency)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&reference)
        .bind(dto.student_id)
        .bind(&dto.description)
        .bind(dto.due)
        .bind(dto.amount)
        .bind(&currency)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!("Invoice reference already exists"))
            } else {
                AppError::database(e)
            }
        })?;

        tracing::info!(invoice_id = %invoice.id, reference = %invoice.reference, "Invoice created");
        Ok(invoice)
    }

    /// Soonest due first. `student_id` restricts the list to one student.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        student_id: Option<Uuid>,
        status: Option<InvoiceStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices
             WHERE ($1::uuid IS NULL OR student_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY due ASC NULLS LAST, created_at ASC
             LIMIT $3",
        )
        .bind(student_id)
        .bind(status)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(invoices)
    }

    /// Records a simulated payment. The row is locked for the update so
    /// concurrent payments add up instead of overwriting each other.
    #[instrument(skip(db))]
    pub async fn pay(
        db: &PgPool,
        id: Uuid,
        owner: Option<Uuid>,
        payment: f64,
    ) -> Result<Invoice, AppError> {
        let mut tx = db.begin().await?;

        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices
             WHERE id = $1 AND ($2::uuid IS NULL OR student_id = $2)
             FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;

        let (paid, status) = apply_payment(invoice.amount, invoice.paid, payment);
        let trace = invoice.trace.unwrap_or_else(payment_trace);

        let updated = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET paid = $2, status = $3, trace = $4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(paid)
        .bind(status)
        .bind(&trace)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        track_invoice_payment(status.as_str());
        tracing::info!(invoice_id = %id, paid, status = status.as_str(), "Invoice payment recorded");
        Ok(updated)
    }
}
