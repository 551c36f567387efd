//! HTTP-level integration tests for the user endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use dosemate_db::models::user::CreateUser;
use dosemate_db::UserStore;
use serde_json::json;

#[tokio::test]
async fn list_users_returns_seeded_users() {
    let (app, store) = common::build_test_app();
    UserStore::create(store.as_ref(), &CreateUser::with_email("pat@example.com"))
        .await
        .unwrap();
    UserStore::create(store.as_ref(), &CreateUser::with_email("sam@example.com"))
        .await
        .unwrap();

    let response = get(app, "/users").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let emails: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails.len(), 2);
    assert!(emails.contains(&"pat@example.com"));
    assert!(emails.contains(&"sam@example.com"));
}

#[tokio::test]
async fn get_user_by_id() {
    let (app, user_id) = common::build_test_app_with_user().await;

    let response = get(app, &format!("/users/{user_id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user_id.to_string());
    assert_eq!(json["email"], "pat@example.com");
    assert_eq!(json["auth_provider"], "google");
    assert_eq!(json["is_active"], true);
}

#[tokio::test]
async fn get_unknown_user_is_404() {
    let (app, _store) = common::build_test_app();
    let missing = dosemate_core::types::new_id();

    let response = get(app, &format!("/users/{missing}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("User with id {missing} not found"));
}

#[tokio::test]
async fn create_user_returns_201_with_defaults() {
    let (app, _store) = common::build_test_app();

    let response = post_json(
        app,
        "/users",
        json!({"email": "lee@example.com", "name": "Lee"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "lee@example.com");
    assert_eq!(json["name"], "Lee");
    assert_eq!(json["auth_provider"], "google");
    assert_eq!(json["is_active"], true);
    assert!(json["id"].is_string());
}

#[tokio::test]
async fn created_user_can_record_progress_over_http() {
    let (app, _store) = common::build_test_app();

    let response = post_json(app.clone(), "/users", json!({"email": "lee@example.com"})).await;
    let user = body_json(response).await;
    let user_id = user["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/users/{user_id}/progress"),
        json!({"metric_name": "streak_days", "value": 5, "int_value": 5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/users/{user_id}/progress?metric_name=streak_days");
    let listed = body_json(get(app, &uri).await).await;
    assert_eq!(listed[0]["int_value"], 5);
}

#[tokio::test]
async fn duplicate_email_is_409() {
    let (app, _store) = common::build_test_app();
    post_json(app.clone(), "/users", json!({"email": "lee@example.com"})).await;

    let response = post_json(app, "/users", json!({"email": "lee@example.com"})).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_email_is_validation_error() {
    let (app, _store) = common::build_test_app();

    let response = post_json(app, "/users", json!({"email": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_email_is_bad_request() {
    let (app, _store) = common::build_test_app();

    let response = post_json(app, "/users", json!({"name": "Lee"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
