//! Handlers for a user's medications.
//!
//! Medications are nested under users:
//! `/users/{user_id}/medications`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use dosemate_core::error::CoreError;
use dosemate_core::types::EntityId;
use dosemate_db::models::medication::{CreateUserMedication, MedicationWithSchedules};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

/// GET /users/{user_id}/medications
pub async fn list(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
) -> AppResult<Json<Vec<MedicationWithSchedules>>> {
    let medications = state.medications.list(user_id).await?;
    Ok(Json(medications))
}

/// POST /users/{user_id}/medications
///
/// Creates the medication and its schedule in one step.
pub async fn create(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
    AppJson(input): AppJson<CreateUserMedication>,
) -> AppResult<(StatusCode, Json<MedicationWithSchedules>)> {
    let today = Utc::now().date_naive();
    let created = state.medications.create(user_id, &input, today).await?;

    tracing::info!(
        %user_id,
        medication_id = %created.medication.id,
        brand_name = %created.medication.brand_name,
        "Medication created",
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /users/{user_id}/medications/{medication_id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath((user_id, medication_id)): AppPath<(EntityId, EntityId)>,
) -> AppResult<StatusCode> {
    let deleted = state.medications.delete(user_id, medication_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Medication",
            id: medication_id,
        }));
    }

    tracing::info!(%user_id, %medication_id, "Medication deleted");

    Ok(StatusCode::NO_CONTENT)
}
