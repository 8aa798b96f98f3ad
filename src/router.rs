use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_governor::GovernorLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use examguard_config::CorsConfig;
use examguard_core::AppError;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::modules::ai::router::init_ai_router;
use crate::modules::applications::router::init_applications_router;
use crate::modules::assignments::router::init_assignments_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::router::init_health_router;
use crate::modules::invoices::router::init_invoices_router;
use crate::modules::messages::router::init_messages_router;
use crate::modules::resources::router::init_resources_router;
use crate::modules::students::router::init_students_router;
use crate::modules::submissions::router::{init_results_router, init_submissions_router};
use crate::modules::timetable::router::init_timetable_router;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::not_found(anyhow!("Not found"))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.is_permissive() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(config.allow_credentials)
}

fn api_router(state: &AppState) -> anyhow::Result<Router<AppState>> {
    Ok(Router::new()
        .nest("/auth", init_auth_router(state)?)
        .nest("/application", init_applications_router(state))
        .nest("/assignments", init_assignments_router(state))
        .nest("/submissions", init_submissions_router(state))
        .nest("/results", init_results_router(state))
        .nest("/invoices", init_invoices_router(state))
        .nest("/messages", init_messages_router(state))
        .nest("/resources", init_resources_router(state))
        .nest("/timetable", init_timetable_router(state))
        .nest("/ai", init_ai_router(state))
        .nest("/students", init_students_router(state)))
}

/// Builds the full application. `metrics` mounts `/metrics` when the
/// Prometheus recorder was installed.
pub fn init_router(state: AppState, metrics: Option<PrometheusHandle>) -> anyhow::Result<Router> {
    let config = state.config.clone();

    let mut app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api", api_router(&state)?)
        .nest_service(&config.upload.url_prefix, ServeDir::new(&config.upload.dir))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes));

    if config.rate_limit.enabled {
        let governor = config.rate_limit.general_governor_config()?;
        app = app.layer(GovernorLayer::new(Arc::new(governor)));
    }

    let app = app
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware));

    Ok(match metrics {
        Some(handle) => app.merge(metrics_app(handle)),
        None => app,
    })
}

