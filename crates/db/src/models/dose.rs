//! Dose log entity model.

use dosemate_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The state of one scheduled dose.
///
/// `slot_time` identifies the dose within its schedule and never changes;
/// `scheduled_time` starts equal to it and moves forward on snooze.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DoseLog {
    pub id: EntityId,
    pub schedule_id: EntityId,
    pub user_id: EntityId,
    pub slot_time: Timestamp,
    pub scheduled_time: Timestamp,
    pub taken_at: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
}
