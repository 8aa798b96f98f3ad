//! Health, fallback and response hardening.

mod common;

use axum::http::{StatusCode, header};
use tower::ServiceExt;

use common::{body_json, get, setup_test_app};

#[tokio::test]
async fn test_healthz_reports_uptime() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/healthz", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_info_names_the_service() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/api/info", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "examguard");
    assert_eq!(body["env"], "development");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/api/nope", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/healthz", None)).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
}

#[tokio::test]
async fn test_errors_carry_security_headers_too() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/api/auth/me", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/invoices/{id}/pay"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
