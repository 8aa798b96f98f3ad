use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use examguard_auth::Identity;
use examguard_core::AppError;

use crate::modules::ai::service::AiQuizService;
use crate::modules::assignments::service::AssignmentService;
use crate::modules::invoices::service::InvoiceService;

use super::model::{DASHBOARD_LIMIT, StudentDashboard};

pub struct StudentService;

impl StudentService {
    /// Lists the caller has no key for (no class, non-UUID subject) come back empty.
    #[instrument(skip(db, identity), fields(subject = %identity.subject))]
    pub async fn dashboard(db: &PgPool, identity: Identity) -> Result<StudentDashboard, AppError> {
        let user_id = Uuid::parse_str(&identity.subject).ok();
        let class_id = identity.class_id().map(str::to_string);

        let assignments = async {
            match class_id.as_deref() {
                Some(class_id) => {
                    AssignmentService::upcoming_for_class(db, class_id, DASHBOARD_LIMIT).await
                }
                None => Ok(Vec::new()),
            }
        };
        let invoices = async {
            match user_id {
                Some(id) => InvoiceService::list(db, Some(id), None, Some(DASHBOARD_LIMIT)).await,
                None => Ok(Vec::new()),
            }
        };
        let aiquizzes = async {
            match user_id {
                Some(id) => AiQuizService::recent_for_user(db, id, DASHBOARD_LIMIT).await,
                None => Ok(Vec::new()),
            }
        };

        let (assignments, invoices, aiquizzes) = tokio::try_join!(assignments, invoices, aiquizzes)?;

        Ok(StudentDashboard {
            ok: true,
            profile: identity,
            exams: Vec::new(),
            assignments,
            invoices,
            aiquizzes,
        })
    }
}
