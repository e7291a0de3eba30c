//! Integration tests — build the router over an in-memory store and drive it
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use roster_api::{AppState, config::ApiConfig};
use roster_core::auth::jwt::TokenLifetimes;
use roster_core::auth::store::MemoryUserStore;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with_secret(secret: &str) -> (Router, MemoryUserStore) {
    let store = MemoryUserStore::with_cost(4);
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: None,
        jwt_secret: secret.into(),
        token_lifetimes: TokenLifetimes::default(),
    };
    let state = AppState::new(Arc::new(store.clone()), config);
    (roster_api::router(state), store)
}

fn app() -> (Router, MemoryUserStore) {
    app_with_secret("test-secret")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn alice() -> Value {
    json!({"username": "alice", "email": "a@x.com", "password": "secret"})
}

#[tokio::test]
async fn register_returns_user_and_tokens() {
    let (app, store) = app();

    let (status, json) = send(&app, post_json("/auth/register", alice())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["email"], "a@x.com");
    assert!(json["user"]["id"].is_string());

    let access = json["access"].as_str().expect("access is string");
    let refresh = json["refresh"].as_str().expect("refresh is string");
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);

    let user = json["user"].as_object().unwrap();
    assert_eq!(user.len(), 3, "unexpected user fields: {user:?}");
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("password_hash"));

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (app, store) = app();
    let (status, _) = send(&app, post_json("/auth/register", alice())).await;
    assert_eq!(status, StatusCode::OK);

    let again = json!({"username": "alice", "email": "other@y.org", "password": "pw"});
    let (status, json) = send(&app, post_json("/auth/register", again)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn empty_username_is_rejected_by_store() {
    let (app, store) = app();
    let body = json!({"username": "", "email": "a@x.com", "password": "secret"});
    let (status, json) = send(&app, post_json("/auth/register", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert!(store.is_empty());
}

#[tokio::test]
async fn missing_field_is_unprocessable() {
    let (app, store) = app();
    let body = json!({"username": "alice", "password": "secret"});
    let (status, _) = send(&app, post_json("/auth/register", body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.is_empty());
}

#[tokio::test]
async fn missing_signing_key_is_server_error_and_persists_nothing() {
    let (app, store) = app_with_secret("");
    let (status, json) = send(&app, post_json("/auth/register", alice())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], "Internal server error");
    assert!(store.is_empty());
}

#[tokio::test]
async fn login_issues_pair_for_registered_user() {
    let (app, _) = app();
    let (_, registered) = send(&app, post_json("/auth/register", alice())).await;

    let body = json!({"username": "alice", "password": "secret"});
    let (status, json) = send(&app, post_json("/auth/token", body)).await;
    assert_eq!(status, StatusCode::OK);

    let access = json["access"].as_str().expect("access is string");
    let refresh = json["refresh"].as_str().expect("refresh is string");
    assert_ne!(access, registered["access"].as_str().unwrap());
    assert_ne!(access, refresh);

    let req = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let (status, me) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, registered["user"]);

    let (status, _) = send(
        &app,
        post_json("/auth/token/refresh", json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _) = app();
    send(&app, post_json("/auth/register", alice())).await;

    for body in [
        json!({"username": "alice", "password": "wrong"}),
        json!({"username": "bob", "password": "secret"}),
    ] {
        let (status, json) = send(&app, post_json("/auth/token", body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");
        assert_eq!(json["message"], "Invalid credentials");
        assert!(json.get("access").is_none());
    }
}

#[tokio::test]
async fn refresh_token_mints_access_token() {
    let (app, _) = app();
    let (_, registered) = send(&app, post_json("/auth/register", alice())).await;

    let body = json!({"refresh": registered["refresh"]});
    let (status, json) = send(&app, post_json("/auth/token/refresh", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json["access"].as_str().unwrap().is_empty());

    let body = json!({"refresh": registered["access"]});
    let (status, json) = send(&app, post_json("/auth/token/refresh", body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn verify_accepts_issued_tokens_only() {
    let (app, _) = app();
    let (_, registered) = send(&app, post_json("/auth/register", alice())).await;

    for token in [&registered["access"], &registered["refresh"]] {
        let (status, _) = send(&app, post_json("/auth/token/verify", json!({"token": token}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(
        &app,
        post_json("/auth/token/verify", json!({"token": "not-a-jwt"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_bearer_access_token() {
    let (app, _) = app();
    let (_, registered) = send(&app, post_json("/auth/register", alice())).await;

    let req = Request::builder()
        .uri("/auth/me")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", registered["access"].as_str().unwrap()),
        )
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, registered["user"]);

    let req = Request::builder()
        .uri("/auth/me")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/auth/me")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", registered["refresh"].as_str().unwrap()),
        )
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = app();
    let req = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], roster_core::version());
}
