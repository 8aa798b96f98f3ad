//! Auth pipeline, role gates and request validation through the real
//! router. None of these requests reach the database.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, get, json_request, setup_test_app, token_for};
use examguard_auth::Role;

const USER_ID: &str = "0b9a3c1e-6f0e-4d43-9d3c-3f5b8f2a7c11";

#[tokio::test]
async fn test_me_without_token_is_401() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get("/api/auth/me", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Missing authorization token");
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Teacher);

    let response = app.oneshot(get("/api/auth/me", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["user"]["subject"], USER_ID);
    assert_eq!(body["user"]["role"], "teacher");
}

#[tokio::test]
async fn test_me_with_token_cookie() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Student);

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("theme=dark; token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["role"], "student");
}

#[tokio::test]
async fn test_garbage_token_is_401() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(get("/api/auth/me", Some("not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let (app, state) = setup_test_app();
    let codec = state.authenticator.codec();
    let issued = Utc::now().timestamp() - codec.lifetime_secs() - 120;
    let token = codec.sign_at(USER_ID, Role::Admin, issued).unwrap();

    let response = app.oneshot(get("/api/auth/me", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_401() {
    let (app, _) = setup_test_app();
    let foreign = examguard_auth::TokenCodec::new(b"someone-else", 3600)
        .sign(USER_ID, Role::Admin)
        .unwrap();

    let response = app.oneshot(get("/api/auth/me", Some(&foreign))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_only_allows_admin() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Admin);

    let response = app
        .oneshot(get("/api/auth/admin-only", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Hello admin");
}

#[tokio::test]
async fn test_admin_only_forbids_teacher() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Teacher);

    let response = app
        .oneshot(get("/api/auth/admin-only", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Insufficient permissions");
}

#[tokio::test]
async fn test_gated_route_without_token_is_401_not_403() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/invoices", None, &json!({"amount": 10})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_cannot_create_invoice() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Student);

    let response = app
        .oneshot(json_request("POST", "/api/invoices", Some(&token), &json!({"amount": 10})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teacher_cannot_submit_exam() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Teacher);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/submissions/exam-1/submit",
            Some(&token),
            &json!({"answers": {}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_cannot_read_results() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Student);

    let response = app.oneshot(get("/api/results", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_cannot_upload_resources() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Staff);

    let request = Request::builder()
        .method("POST")
        .uri("/api/resources")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X")
        .body(Body::from("--X--\r\n"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_timetable_without_class_is_400() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Student);

    let response = app.oneshot(get("/api/timetable", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "class query required");
}

#[tokio::test]
async fn test_save_timetable_requires_class_id() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Teacher);

    let response = app
        .oneshot(json_request("POST", "/api/timetable", Some(&token), &json!({"entries": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "classId required");
}

#[tokio::test]
async fn test_login_without_credentials_is_400() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/auth/login", None, &json!({"username": "ada"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "username/email and password required"
    );
}

#[tokio::test]
async fn test_login_without_json_content_type_is_400() {
    let (app, _) = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from(r#"{"username":"ada","password":"secret1"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_short_password_is_400() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({"username": "ada", "password": "123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "username and password (min 6) required"
    );
}

#[tokio::test]
async fn test_self_registration_cannot_pick_admin_role() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({"username": "mallory", "password": "secret123", "role": "admin"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_ids_are_404() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, USER_ID, Role::Student);

    let resource = app
        .clone()
        .oneshot(get("/api/resources/not-a-uuid", None))
        .await
        .unwrap();
    assert_eq!(resource.status(), StatusCode::NOT_FOUND);

    let quiz = app
        .oneshot(get("/api/ai/not-a-uuid", Some(&token)))
        .await
        .unwrap();
    assert_eq!(quiz.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(quiz).await["message"], "Not found");
}

#[tokio::test]
async fn test_non_uuid_subject_cannot_generate_quiz() {
    let (app, state) = setup_test_app();
    let token = token_for(&state, "legacy-user", Role::Student);

    let response = app
        .oneshot(json_request("POST", "/api/ai/generate", Some(&token), &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid user ID in token");
}
