//! Handlers for daily dose reminders.
//!
//! Reminders are derived from the user's schedules: each dose time on a day
//! the schedule applies to is one reminder, backed by a dose log that is
//! created the first time the slot is listed. Dose times are read as UTC.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use dosemate_core::doses::is_overdue;
use dosemate_core::schedules::{applies_on, dose_slots_on};
use dosemate_core::types::{EntityId, Timestamp};
use dosemate_db::models::dose::DoseLog;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::query::ReminderParams;
use crate::state::AppState;

/// One dose due on the requested day.
#[derive(Debug, Serialize)]
pub struct Reminder {
    /// Dose log id, used by the mark-taken and snooze endpoints.
    pub id: EntityId,
    pub schedule_id: EntityId,
    /// Medication brand name.
    pub name: String,
    pub strength: Option<String>,
    pub quantity: Option<String>,
    /// Dose time as entered, e.g. `"8:00 AM"`.
    pub time: String,
    pub scheduled_time: Timestamp,
    pub status: String,
    pub overdue: bool,
    pub instructions: Option<String>,
}

/// GET /users/{user_id}/reminders/today?date=YYYY-MM-DD
///
/// Ordered by scheduled time, so snoozed doses move down the list.
pub async fn today(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<EntityId>,
    AppQuery(params): AppQuery<ReminderParams>,
) -> AppResult<Json<Vec<Reminder>>> {
    let now = Utc::now();
    let date = params.date.unwrap_or_else(|| now.date_naive());

    let schedules = state.medications.reminder_schedules(user_id).await?;

    let mut reminders = Vec::new();
    for schedule in schedules
        .iter()
        .filter(|s| applies_on(&s.days, s.start_date, s.end_date, date))
    {
        for (time, slot) in dose_slots_on(date, &schedule.time_of_day) {
            let dose = state
                .doses
                .get_or_create(user_id, schedule.schedule_id, slot.and_utc())
                .await?;
            reminders.push(Reminder {
                id: dose.id,
                schedule_id: schedule.schedule_id,
                name: schedule.medication_name.clone(),
                strength: schedule.strength.clone(),
                quantity: schedule.quantity.clone(),
                time,
                scheduled_time: dose.scheduled_time,
                overdue: is_overdue(&dose.status, dose.scheduled_time, now),
                status: dose.status,
                instructions: schedule.food_instructions.clone(),
            });
        }
    }

    reminders.sort_by(|a, b| {
        a.scheduled_time
            .cmp(&b.scheduled_time)
            .then_with(|| a.name.cmp(&b.name))
    });

    tracing::debug!(%user_id, %date, count = reminders.len(), "Built reminders");

    Ok(Json(reminders))
}

/// POST /users/{user_id}/reminders/{dose_id}/mark-taken
pub async fn mark_taken(
    State(state): State<AppState>,
    AppPath((user_id, dose_id)): AppPath<(EntityId, EntityId)>,
) -> AppResult<Json<DoseLog>> {
    let dose = state.doses.mark_taken(user_id, dose_id, Utc::now()).await?;
    tracing::info!(%user_id, %dose_id, "Dose marked taken");
    Ok(Json(dose))
}

/// POST /users/{user_id}/reminders/{dose_id}/snooze
///
/// Taken doses cannot be snoozed (`409 CONFLICT`).
pub async fn snooze(
    State(state): State<AppState>,
    AppPath((user_id, dose_id)): AppPath<(EntityId, EntityId)>,
) -> AppResult<Json<DoseLog>> {
    let dose = state.doses.snooze(user_id, dose_id).await?;
    tracing::info!(
        %user_id,
        %dose_id,
        scheduled_time = %dose.scheduled_time,
        "Dose snoozed",
    );
    Ok(Json(dose))
}
