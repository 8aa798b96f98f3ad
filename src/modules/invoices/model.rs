use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use examguard_core::AppError;
use examguard_core::serde::{deserialize_optional_date, deserialize_optional_trimmed};

pub const DEFAULT_CURRENCY: &str = "NGN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(AppError::bad_request(anyhow!("status is invalid"))),
        }
    }
}

/// New paid total and status after a payment of `payment`. The total never
/// exceeds the invoice amount.
pub fn apply_payment(amount: f64, paid: f64, payment: f64) -> (f64, InvoiceStatus) {
    let paid = amount.min(paid + payment.max(0.0));
    let status = if paid >= amount {
        InvoiceStatus::Paid
    } else if paid > 0.0 {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Unpaid
    };
    (paid, status)
}

/// `TRC-` followed by seven uppercase letters or digits.
pub fn payment_trace() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    format!("TRC-{}", suffix)
}

pub fn default_reference() -> String {
    format!("INV-{}", Utc::now().timestamp_millis())
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[serde(rename = "ref")]
    #[sqlx(rename = "ref")]
    pub reference: String,
    pub student_id: Option<Uuid>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub amount: f64,
    pub paid: f64,
    pub currency: String,
    pub status: InvoiceStatus,
    pub trace: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(default, rename = "ref", deserialize_with = "deserialize_optional_trimmed")]
    pub reference: Option<String>,
    #[serde(default)]
    pub student_id: Option<Uuid>,
    #[serde(default, alias = "desc", deserialize_with = "deserialize_optional_trimmed")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PayInvoiceRequest {
    #[serde(default)]
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilter {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub status: Option<String>,
}

impl InvoiceFilter {
    pub fn status(&self) -> Result<Option<InvoiceStatus>, AppError> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub ok: bool,
    pub invoice: Invoice,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceListResponse {
    pub ok: bool,
    pub invoices: Vec<Invoice>,
}
