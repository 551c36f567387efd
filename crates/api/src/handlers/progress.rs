//! Handlers for the `/progress` resource.
//!
//! Progress entries are nested under users:
//! `/users/{user_id}/progress`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dosemate_core::progress::{normalize_metric_filter, resolve_limit};
use dosemate_core::types::EntityId;
use dosemate_db::models::progress::{CreateProgressEntry, ProgressEntry, ProgressQuery};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::ProgressListParams;
use crate::state::AppState;

/// GET /users/{user_id}/progress?metric_name=&limit=
///
/// Newest entries first. `limit` falls back to 50 when absent, invalid, or
/// repeated with different values.
pub async fn list(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> AppResult<Json<Vec<ProgressEntry>>> {
    let params = ProgressListParams::from_pairs(pairs)?;
    let query = ProgressQuery {
        metric_name: normalize_metric_filter(params.metric_name.as_deref()),
        limit: resolve_limit(params.limit.as_deref()),
    };
    let entries = state.progress.list(user_id, &query).await?;
    Ok(Json(entries))
}

/// POST /users/{user_id}/progress
pub async fn create(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
    AppJson(input): AppJson<CreateProgressEntry>,
) -> AppResult<(StatusCode, Json<ProgressEntry>)> {
    let entry = state.progress.create(user_id, &input).await?;

    tracing::info!(
        %user_id,
        entry_id = %entry.id,
        metric_name = %entry.metric_name,
        value = entry.value,
        "Progress entry created",
    );

    Ok((StatusCode::CREATED, Json(entry)))
}
