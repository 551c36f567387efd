#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use dosemate_api::config::{LogFormat, ServerConfig};
use dosemate_api::router::build_app_router;
use dosemate_api::state::AppState;
use dosemate_core::types::EntityId;
use dosemate_db::models::user::CreateUser;
use dosemate_db::{MemoryStore, UserStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        database_max_connections: 1,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The store is returned as well so tests can seed users directly.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::in_memory(config.clone(), Arc::clone(&store));
    (build_app_router(state, &config), store)
}

/// Insert the default test user directly into the store.
pub async fn seed_user(store: &MemoryStore) -> EntityId {
    UserStore::create(store, &CreateUser::with_email("pat@example.com"))
        .await
        .expect("seed user")
        .id
}

/// Build the app and seed one user, returning the user's id.
pub async fn build_test_app_with_user() -> (Router, EntityId) {
    let (app, store) = build_test_app();
    let user_id = seed_user(&store).await;
    (app, user_id)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
