//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dosemate_core::error::CoreError;
use dosemate_core::types::EntityId;
use dosemate_db::models::user::{CreateUser, User};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

/// GET /users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// POST /users
///
/// Duplicate emails are rejected with `409 CONFLICT`.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.users.create(&input).await?;

    tracing::info!(user_id = %user.id, auth_provider = %user.auth_provider, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/{user_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
) -> AppResult<Json<User>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(Json(user))
}
