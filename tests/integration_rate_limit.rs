mod common;

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::json_request;
use examguard::router::init_router;
use examguard::state::{AppConfig, AppState};
use examguard_config::RateLimitConfig;

/// One auth request per hour, generous general limit.
fn setup_rate_limited_app() -> axum::Router {
    let mut config = AppConfig::for_tests();
    config.rate_limit = RateLimitConfig {
        enabled: true,
        general_per_minute: 100,
        auth_per_hour: 1,
    };
    let state = AppState::for_tests(config).unwrap();
    init_router(state, None).unwrap()
}

fn from_peer(mut request: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    request
}

fn incomplete_login() -> Request<Body> {
    json_request("POST", "/api/auth/login", None, &json!({"username": "ada"}))
}

#[tokio::test]
async fn test_auth_rate_limit_exceeded() {
    let app = setup_rate_limited_app();

    let first = app
        .clone()
        .oneshot(from_peer(incomplete_login(), [10, 0, 0, 1]))
        .await
        .unwrap();
    // Processed: rejected for the missing password, not throttled.
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app
        .oneshot(from_peer(incomplete_login(), [10, 0, 0, 1]))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_auth_rate_limit_is_per_ip() {
    let app = setup_rate_limited_app();

    let first = app
        .clone()
        .oneshot(from_peer(incomplete_login(), [10, 0, 0, 2]))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let other_peer = app
        .oneshot(from_peer(incomplete_login(), [10, 0, 0, 3]))
        .await
        .unwrap();
    assert_eq!(other_peer.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_limit_does_not_throttle_other_routes() {
    let app = setup_rate_limited_app();

    let login = app
        .clone()
        .oneshot(from_peer(incomplete_login(), [10, 0, 0, 4]))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::BAD_REQUEST);

    for _ in 0..3 {
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let response = app
            .clone()
            .oneshot(from_peer(request, [10, 0, 0, 4]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
