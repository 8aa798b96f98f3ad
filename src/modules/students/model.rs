use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use examguard_auth::Identity;

use crate::modules::ai::model::AiQuiz;
use crate::modules::assignments::model::Assignment;
use crate::modules::invoices::model::Invoice;

/// Each list holds at most this many rows.
pub const DASHBOARD_LIMIT: i64 = 10;

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboard {
    pub ok: bool,
    pub profile: Identity,
    /// No exam catalogue exists yet; always empty.
    #[schema(value_type = Vec<Object>)]
    pub exams: Vec<Value>,
    pub assignments: Vec<Assignment>,
    pub invoices: Vec<Invoice>,
    pub aiquizzes: Vec<AiQuiz>,
}
