use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use examguard_auth::{Identity, Role, UserProfile};
use examguard_core::PageParams;

use crate::modules::auth::controller::ErrorResponse;
use crate::utils::upload::StoredFile;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::healthz,
        crate::modules::health::controller::ready,
        crate::modules::health::controller::info,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::admin_only,
        crate::modules::applications::controller::submit_application,
        crate::modules::applications::controller::application_login,
        crate::modules::applications::controller::get_application,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::list_assignments,
        crate::modules::assignments::controller::submit_assignment,
        crate::modules::submissions::controller::submit_exam,
        crate::modules::submissions::controller::list_submissions,
        crate::modules::submissions::controller::update_submission,
        crate::modules::submissions::controller::list_results,
        crate::modules::submissions::controller::update_result_status,
        crate::modules::invoices::controller::create_invoice,
        crate::modules::invoices::controller::list_invoices,
        crate::modules::invoices::controller::pay_invoice,
        crate::modules::messages::controller::send_message,
        crate::modules::messages::controller::list_messages,
        crate::modules::resources::controller::list_resources,
        crate::modules::resources::controller::upload_resource,
        crate::modules::resources::controller::get_resource,
        crate::modules::timetable::controller::get_timetable,
        crate::modules::timetable::controller::save_timetable,
        crate::modules::ai::controller::generate_quiz,
        crate::modules::ai::controller::get_quiz,
        crate::modules::students::controller::get_dashboard,
    ),
    components(
        schemas(ErrorResponse, Identity, UserProfile, Role, StoredFile, PageParams)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness, readiness and build info"),
        (name = "Authentication", description = "Registration, login and token identity"),
        (name = "Applications", description = "Admission applications with document uploads"),
        (name = "Assignments", description = "Assignments and student hand-ins"),
        (name = "Submissions", description = "Exam submissions"),
        (name = "Results", description = "Paged results review and publishing"),
        (name = "Invoices", description = "Fee invoices and simulated payments"),
        (name = "Messages", description = "Staff to user and class messaging"),
        (name = "Resources", description = "Shared learning resources"),
        (name = "Timetable", description = "Class timetables"),
        (name = "AI", description = "Placeholder quiz generation"),
        (name = "Students", description = "Student dashboard")
    ),
    info(
        title = "ExamGuard API",
        version = "0.1.0",
        description = "School portal API: admissions, exams, assignments, invoices and messaging behind JWT role gates.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
