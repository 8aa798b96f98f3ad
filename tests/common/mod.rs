#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use examguard::router::init_router;
use examguard::state::{AppConfig, AppState};
use examguard_auth::Role;
use examguard_core::hash_password_with_cost;

/// App over a pool that never connects. Only routes that reject before any
/// query runs can be exercised with it.
pub fn setup_test_app() -> (Router, AppState) {
    let state = AppState::for_tests(AppConfig::for_tests()).unwrap();
    let app = init_router(state.clone(), None).unwrap();
    (app, state)
}

pub fn setup_db_app(pool: PgPool) -> (Router, AppState) {
    let state = AppState::new(pool, AppConfig::for_tests());
    let app = init_router(state.clone(), None).unwrap();
    (app, state)
}

pub fn token_for(state: &AppState, subject: &str, role: Role) -> String {
    state.authenticator.codec().sign(subject, role).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn generate_unique_username() -> String {
    format!("user-{}", Uuid::new_v4().simple())
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// Inserts a user directly, bypassing registration rules.
pub async fn create_test_user(pool: &PgPool, role: Role, class_id: Option<&str>) -> TestUser {
    let username = generate_unique_username();
    let password = "testpass123".to_string();
    let hash = hash_password_with_cost(&password, 4).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, password_hash, role, class_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(&username)
    .bind(&hash)
    .bind(role.as_str())
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        password,
    }
}
